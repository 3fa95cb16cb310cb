/// Error that can occur when converting a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// A node the converter has no mapping for. `line` is 1-based, `column`
    /// 0-based, both at the start of the node.
    #[error("Unexpected node type {kind} ({line}:{column})")]
    UnsupportedConstruct {
        kind: String,
        line: usize,
        column: usize,
    },

    /// The parser could not be set up or gave up on the input.
    #[error("front-end error: {0}")]
    FrontEnd(String),
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message() {
        let err = ConvertError::UnsupportedConstruct {
            kind: "interface_declaration".into(),
            line: 3,
            column: 4,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected node type interface_declaration (3:4)"
        );
    }
}
