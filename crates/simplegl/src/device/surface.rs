use super::{ContextInit, Platform};

/// Result of surface creation + context acquisition.
///
/// Either half may be missing; a missing `gl` is the degraded state in which
/// every drawing operation is a no-op.
pub(crate) struct Acquired<P: Platform> {
    pub surface: Option<P::Surface>,
    pub gl: Option<P::Gl>,
}

/// Creates the backing surface and tries each context identifier in order.
///
/// Failures are logged, never returned.
pub(crate) fn acquire<P: Platform>(platform: &P, init: &ContextInit) -> Acquired<P> {
    let surface = match platform.create_surface(init.size()) {
        Ok(surface) => surface,
        Err(err) => {
            log::warn!(
                "{} cannot be initialized: the platform cannot create a drawing surface ({err:#})",
                crate::NAME
            );
            return Acquired { surface: None, gl: None };
        }
    };

    let gl = init.context_ids.iter().find_map(|id| {
        let gl = platform.acquire_context(&surface, id);
        if gl.is_some() {
            log::debug!("acquired drawing context '{id}'");
        }
        gl
    });

    if gl.is_none() {
        log::warn!(
            "{} cannot be initialized: the platform does not support WebGL (tried {:?})",
            crate::NAME,
            init.context_ids
        );
    }

    Acquired {
        surface: Some(surface),
        gl,
    }
}
