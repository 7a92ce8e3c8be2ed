//! Named example equations.

/// A named example equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub equation: &'static str,
}

impl Preset {
    /// Lower-case, dash-separated form of the name (`bad-low-bits`).
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_end_matches('-').to_string()
    }
}

/// The bundled presets.
pub struct BuiltinPresets;

impl BuiltinPresets {
    const PRESETS: [Preset; 6] = [
        Preset {
            name: "LCG",
            equation: "(x * 1664525) + 1013904223",
        },
        Preset {
            name: "Xorshift32",
            equation: "x ^ (x << 13)",
        },
        Preset {
            name: "Xorshift with ROL",
            equation: "x ^ (x ROL 13)",
        },
        Preset {
            name: "Counter",
            equation: "x + 1",
        },
        Preset {
            name: "Bad (Low Bits)",
            equation: "x + 4",
        },
        Preset {
            name: "Complex Mix",
            equation: "(x ^ (x >> 15)) * (x | 0x55555555)",
        },
    ];

    pub fn all() -> &'static [Preset] {
        &Self::PRESETS
    }

    /// Find a preset by name or slug, ignoring case.
    pub fn get(name: &str) -> Option<Preset> {
        let wanted = name.trim();
        Self::PRESETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(wanted) || p.slug().eq_ignore_ascii_case(wanted))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::compile;

    #[test]
    fn test_slug() {
        let preset = BuiltinPresets::get("Bad (Low Bits)").unwrap();
        assert_eq!(preset.slug(), "bad-low-bits");
    }

    #[test]
    fn test_lookup_by_slug() {
        let preset = BuiltinPresets::get("xorshift-with-rol").unwrap();
        assert_eq!(preset.equation, "x ^ (x ROL 13)");
        assert!(BuiltinPresets::get("nope").is_none());
    }

    #[test]
    fn test_all_presets_compile() {
        for preset in BuiltinPresets::all() {
            assert!(compile(preset.equation).is_ok(), "{} failed", preset.name);
        }
    }
}
