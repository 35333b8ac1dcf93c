//! Parsed HLSL-style semantics, shared by both backends'
//! entry-point materialization: the SPIR-V backend turns these into
//! `Location`/`BuiltIn` decorations, the HLSL backend passes the original
//! string straight through as a parameter semantic.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Position,
    PointSize,
    Depth,
    VertexId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Semantic {
    Builtin(Builtin),
    /// `COLORn` / `SV_TARGETn` / `TEXCOORDn`, any semantic carrying an index.
    Indexed { name: String, index: u32 },
    /// Any other semantic string, treated as index 0.
    Named(String),
}

impl Semantic {
    pub fn parse(raw: &str) -> Semantic {
        let upper = raw.to_ascii_uppercase();
        match upper.as_str() {
            "SV_POSITION" => return Semantic::Builtin(Builtin::Position),
            "SV_POINTSIZE" => return Semantic::Builtin(Builtin::PointSize),
            "SV_DEPTH" => return Semantic::Builtin(Builtin::Depth),
            "SV_VERTEXID" | "VERTEXID" => return Semantic::Builtin(Builtin::VertexId),
            _ => {}
        }
        for prefix in ["COLOR", "SV_TARGET", "TEXCOORD"] {
            if let Some(rest) = upper.strip_prefix(prefix) {
                if let Ok(index) = rest.parse::<u32>() {
                    return Semantic::Indexed {
                        name: prefix.to_string(),
                        index,
                    };
                }
                if rest.is_empty() {
                    return Semantic::Indexed {
                        name: prefix.to_string(),
                        index: 0,
                    };
                }
            }
        }
        Semantic::Named(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_builtins_case_insensitively() {
        assert_eq!(Semantic::parse("sv_position"), Semantic::Builtin(Builtin::Position));
    }

    #[test]
    fn parses_indexed_texcoord() {
        assert_eq!(
            Semantic::parse("TEXCOORD1"),
            Semantic::Indexed {
                name: "TEXCOORD".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn unrecognized_semantic_falls_back_to_named() {
        assert_eq!(Semantic::parse("MYDATA"), Semantic::Named("MYDATA".to_string()));
    }
}
