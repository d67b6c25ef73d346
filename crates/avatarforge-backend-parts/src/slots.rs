//! Equipment slot markers and their colors.

use avatarforge_spec::{BodyPartDescriptor, Color, EquipmentName, EquipmentSlot, MaterialClass, Recipe};

/// Normalizes a recipe color to uppercase `#RRGGBB`.
///
/// Malformed colors are passed through unchanged; the solver does not
/// validate (see `validate_recipe`).
pub fn normalize_color(hex: &str) -> String {
    match Color::from_hex(hex) {
        Some(color) => color.to_hex(),
        None => {
            log::warn!("color '{}' is not #RRGGBB, passing it through", hex);
            hex.to_string()
        }
    }
}

/// Material class and color for a slot type string.
pub fn resolve_slot_color(recipe: &Recipe, slot: EquipmentSlot, type_name: &str) -> (MaterialClass, String) {
    let (class, matched) = slot.classify(type_name);
    if !matched {
        log::debug!("{} '{}' matched no keyword, using {:?}", slot, type_name, class);
    }
    (class, normalize_color(recipe.color_for(class)))
}

/// One marker per active slot, in slot order.
pub fn generate_slot_markers(recipe: &Recipe) -> Vec<BodyPartDescriptor> {
    recipe
        .active_slots()
        .map(|(slot, type_name)| {
            let (_, color) = resolve_slot_color(recipe, slot, type_name);
            BodyPartDescriptor::marker(EquipmentName::format(slot, type_name), color)
        })
        .collect()
}
