/// Shader pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Driver-facing stage name, as used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX_SHADER",
            ShaderStage::Fragment => "FRAGMENT_SHADER",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One variable name or an ordered list of names.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Names {
    One(String),
    Many(Vec<String>),
}

impl Names {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Names::One(name) => std::slice::from_ref(name),
            Names::Many(names) => names,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Names::One(name.to_owned())
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Names::One(name)
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        Names::Many(names)
    }
}

impl From<Vec<&str>> for Names {
    fn from(names: Vec<&str>) -> Self {
        Names::Many(names.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(names: [&str; N]) -> Self {
        Names::Many(names.iter().map(|n| (*n).to_owned()).collect())
    }
}

/// Shader variables to resolve once a program is linked.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct VarsDesc {
    pub attribute: Option<Names>,
    pub uniform: Option<Names>,
}

impl VarsDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, names: impl Into<Names>) -> Self {
        self.attribute = Some(names.into());
        self
    }

    pub fn uniform(mut self, names: impl Into<Names>) -> Self {
        self.uniform = Some(names.into());
        self
    }
}

/// Program to compile and link.
///
/// A missing source compiles as the empty string.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ProgramDesc {
    pub vertex: Option<String>,
    pub fragment: Option<String>,
    pub vars: Option<VarsDesc>,
}

impl ProgramDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(mut self, source: impl Into<String>) -> Self {
        self.vertex = Some(source.into());
        self
    }

    pub fn fragment(mut self, source: impl Into<String>) -> Self {
        self.fragment = Some(source.into());
        self
    }

    pub fn vars(mut self, vars: VarsDesc) -> Self {
        self.vars = Some(vars);
        self
    }

    /// Source for `stage`, empty when omitted.
    pub fn source(&self, stage: ShaderStage) -> &str {
        let source = match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        };
        source.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_one_iterates_once() {
        let n = Names::from("a_pos");
        assert_eq!(n.iter().collect::<Vec<_>>(), vec!["a_pos"]);
    }

    #[test]
    fn names_many_keeps_order() {
        let n = Names::from(["b", "a", "c"]);
        assert_eq!(n.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn missing_source_is_empty() {
        let d = ProgramDesc::new().vertex("void main() {}");
        assert_eq!(d.source(ShaderStage::Vertex), "void main() {}");
        assert_eq!(d.source(ShaderStage::Fragment), "");
    }
}
