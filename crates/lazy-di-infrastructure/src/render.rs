//! Human-readable rendering of resolved instances
//!
//! Instances are type-erased; only the types produced by the built-in
//! providers and manifests are recognised.

use lazy_di_core::{Instance, ProviderGroup};

/// Placeholder for values of unknown type
pub const OPAQUE: &str = "<opaque>";

/// Render an instance as text
///
/// Groups render one `name = value` line per member.
pub fn render_instance(instance: &Instance) -> String {
    if let Some(group) = instance.downcast_ref::<ProviderGroup>() {
        return group
            .iter()
            .map(|(name, member)| format!("{name} = {}", render_instance(member)))
            .collect::<Vec<_>>()
            .join("\n");
    }
    render_scalar(instance).unwrap_or_else(|| OPAQUE.to_string())
}

fn render_scalar(instance: &Instance) -> Option<String> {
    macro_rules! try_display {
        ($($ty:ty),*) => {
            $(
                if let Some(value) = instance.downcast_ref::<$ty>() {
                    return Some(value.to_string());
                }
                if let Some(value) = instance.downcast_ref::<Option<$ty>>() {
                    return Some(match value {
                        Some(value) => value.to_string(),
                        None => "None".to_string(),
                    });
                }
            )*
        };
    }

    try_display!(String, i64, i32, u64, u32, usize, u8, f64, bool, toml::Value);
    if let Some(value) = instance.downcast_ref::<&'static str>() {
        return Some((*value).to_string());
    }
    if instance.downcast_ref::<()>().is_some() {
        return Some("()".to_string());
    }
    None
}
