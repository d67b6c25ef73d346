//! Canonical hashing of recipes and solver output.
//!
//! Hashes are `hex(BLAKE3(canonical_json))`, where canonical JSON has sorted
//! object keys and no whitespace. They identify a recipe independently of
//! field order and let determinism tests compare solver runs cheaply.

use crate::descriptor::BodyPartDescriptor;
use crate::error::SpecError;
use crate::recipe::Recipe;

/// Computes the canonical BLAKE3 hash of a recipe.
///
/// # Example
/// ```
/// use avatarforge_spec::hash::canonical_recipe_hash;
/// use avatarforge_spec::recipe::Recipe;
///
/// let hash = canonical_recipe_hash(&Recipe::default()).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_recipe_hash(recipe: &Recipe) -> Result<String, SpecError> {
    canonical_value_hash(&recipe.to_value()?)
}

/// Computes the canonical BLAKE3 hash of an ordered descriptor list.
pub fn descriptors_hash(descriptors: &[BodyPartDescriptor]) -> Result<String, SpecError> {
    canonical_value_hash(&serde_json::to_value(descriptors)?)
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> Result<String, SpecError> {
    let canonical = canonicalize_json(value)?;
    Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
}

/// Canonicalizes a JSON value: sorted keys, no whitespace, minimal escaping.
///
/// Non-finite numbers cannot occur in a `serde_json::Value`; a number that
/// fits neither integer nor float representation is rejected.
pub fn canonicalize_json(value: &serde_json::Value) -> Result<String, SpecError> {
    let mut out = String::new();
    write_canonical(value, &mut out)?;
    Ok(out)
}

fn write_canonical(value: &serde_json::Value, out: &mut String) -> Result<(), SpecError> {
    match value {
        serde_json::Value::Null => out.push_str("null"),
        serde_json::Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        serde_json::Value::Number(n) => out.push_str(&format_number(n)?),
        serde_json::Value::String(s) => write_string(s, out),
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(item, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn format_number(n: &serde_json::Number) -> Result<String, SpecError> {
    if let Some(i) = n.as_i64() {
        return Ok(i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.to_string());
    }
    let f = n
        .as_f64()
        .ok_or_else(|| SpecError::Canonicalization(format!("unrepresentable number {}", n)))?;
    if f == 0.0 {
        return Ok("0".to_string());
    }
    if f.fract() == 0.0 && f.abs() < 1e15 {
        return Ok(format!("{}", f as i64));
    }
    Ok(format!("{}", f))
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_key_order_independent() {
        let a = json!({"b": 1, "a": [true, null, "x"]});
        let b = json!({"a": [true, null, "x"], "b": 1});
        assert_eq!(canonicalize_json(&a).unwrap(), r#"{"a":[true,null,"x"],"b":1}"#);
        assert_eq!(
            canonical_value_hash(&a).unwrap(),
            canonical_value_hash(&b).unwrap()
        );
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(canonicalize_json(&json!(2.0)).unwrap(), "2");
        assert_eq!(canonicalize_json(&json!(0.5)).unwrap(), "0.5");
        assert_eq!(canonicalize_json(&json!(-0.0)).unwrap(), "0");
    }

    #[test]
    fn test_recipe_hash_changes_with_content() {
        let base = Recipe::default();
        let armored = Recipe {
            torso_slot: "PlateArmor".to_string(),
            ..Default::default()
        };
        let h1 = canonical_recipe_hash(&base).unwrap();
        let h2 = canonical_recipe_hash(&armored).unwrap();
        assert_eq!(h1, canonical_recipe_hash(&Recipe::default()).unwrap());
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(
            canonicalize_json(&json!("a\"b\n\u{1}")).unwrap(),
            r#""a\"b\n\u0001""#
        );
    }
}
