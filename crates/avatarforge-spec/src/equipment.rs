//! Equipment slots, material classes, and the `"<Slot>_<Type>"` name convention.

use serde::{Deserialize, Serialize};

/// Type string that marks a slot as empty.
pub const NONE_TYPE: &str = "None";

/// One of the seven independent equipment zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Head,
    Shoulders,
    Torso,
    Arms,
    Hands,
    Legs,
    Feet,
}

impl EquipmentSlot {
    /// All slots in solver output order.
    pub const ALL: [EquipmentSlot; 7] = [
        EquipmentSlot::Head,
        EquipmentSlot::Shoulders,
        EquipmentSlot::Torso,
        EquipmentSlot::Arms,
        EquipmentSlot::Hands,
        EquipmentSlot::Legs,
        EquipmentSlot::Feet,
    ];

    /// Returns the slot token used in descriptor names.
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentSlot::Head => "Head",
            EquipmentSlot::Shoulders => "Shoulders",
            EquipmentSlot::Torso => "Torso",
            EquipmentSlot::Arms => "Arms",
            EquipmentSlot::Hands => "Hands",
            EquipmentSlot::Legs => "Legs",
            EquipmentSlot::Feet => "Feet",
        }
    }

    /// Parses a slot token, ignoring ASCII case.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(token))
    }

    /// Ordered keyword table used to classify a type string for this slot.
    ///
    /// Earlier entries win, so multi-keyword types resolve deterministically
    /// (`"PlateLeatherHybrid"` is plate).
    pub fn material_keywords(&self) -> &'static [(&'static str, MaterialClass)] {
        match self {
            EquipmentSlot::Hands | EquipmentSlot::Feet => &[
                ("plate", MaterialClass::Metal),
                ("chain", MaterialClass::Chain),
                ("mail", MaterialClass::Chain),
                ("cloth", MaterialClass::Cloth),
                ("wrap", MaterialClass::Cloth),
                ("shoes", MaterialClass::Cloth),
                ("leather", MaterialClass::Leather),
            ],
            _ => &[
                ("plate", MaterialClass::Metal),
                ("chain", MaterialClass::Chain),
                ("mail", MaterialClass::Chain),
                ("leather", MaterialClass::Leather),
                ("cloth", MaterialClass::Cloth),
            ],
        }
    }

    /// Material class used when no keyword matches.
    pub fn default_material(&self) -> MaterialClass {
        match self {
            EquipmentSlot::Hands | EquipmentSlot::Feet => MaterialClass::Leather,
            _ => MaterialClass::Cloth,
        }
    }

    /// Classifies a type string for this slot.
    ///
    /// Returns the material class and whether a keyword matched (`false`
    /// means the slot default was used).
    pub fn classify(&self, type_name: &str) -> (MaterialClass, bool) {
        let lower = type_name.to_ascii_lowercase();
        self.material_keywords()
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, class)| (*class, true))
            .unwrap_or((self.default_material(), false))
    }
}

impl std::fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Material class, each backed by one recipe color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    Skin,
    Cloth,
    Leather,
    Metal,
    Chain,
    Wood,
}

impl MaterialClass {
    /// Classifies a geometry part name (weapon sub-parts, limbs).
    ///
    /// Metal keywords win over wood, everything else reads as leather
    /// (hilt grips and the like).
    pub fn for_part_name(name: &str) -> MaterialClass {
        let lower = name.to_ascii_lowercase();
        const METAL: [&str; 5] = ["metal", "blade", "guard", "plate", "head"];
        const WOOD: [&str; 3] = ["wood", "shaft", "handle"];
        if METAL.iter().any(|k| lower.contains(k)) {
            MaterialClass::Metal
        } else if WOOD.iter().any(|k| lower.contains(k)) {
            MaterialClass::Wood
        } else {
            MaterialClass::Leather
        }
    }
}

/// Returns true when a slot type string denotes an empty slot.
pub fn is_none_type(type_name: &str) -> bool {
    let trimmed = type_name.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NONE_TYPE)
}

/// A parsed equipment descriptor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentName {
    /// Anatomical slot (first underscore token).
    pub slot: EquipmentSlot,
    /// Material/type string (second underscore token).
    pub type_name: String,
}

impl EquipmentName {
    /// Formats the descriptor name for a slot and type.
    pub fn format(slot: EquipmentSlot, type_name: &str) -> String {
        format!("{}_{}", slot.as_str(), type_name)
    }

    /// Parses `"<Slot>_<Type>"`.
    ///
    /// Names without an underscore are arsenal/limb geometry and return
    /// `None`, as do names whose slot token is not a known slot or whose
    /// type token is empty.
    pub fn parse(name: &str) -> Option<Self> {
        let mut tokens = name.split('_');
        let slot = tokens.next()?;
        let type_name = tokens.next()?;
        if type_name.is_empty() {
            return None;
        }
        Some(Self {
            slot: EquipmentSlot::from_token(slot)?,
            type_name: type_name.to_string(),
        })
    }

    /// Material class of this equipment piece.
    pub fn material(&self) -> MaterialClass {
        self.slot.classify(&self.type_name).0
    }

    /// Returns true when the type contains `keyword`, ignoring ASCII case.
    pub fn type_contains(&self, keyword: &str) -> bool {
        self.type_name
            .to_ascii_lowercase()
            .contains(&keyword.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slot_token_round_trip() {
        for slot in EquipmentSlot::ALL {
            assert_eq!(EquipmentSlot::from_token(slot.as_str()), Some(slot));
        }
        assert_eq!(EquipmentSlot::from_token("torso"), Some(EquipmentSlot::Torso));
        assert_eq!(EquipmentSlot::from_token("Tail"), None);
    }

    #[test]
    fn test_classify_priority() {
        let torso = EquipmentSlot::Torso;
        assert_eq!(torso.classify("PlateArmor"), (MaterialClass::Metal, true));
        assert_eq!(torso.classify("ChainMail"), (MaterialClass::Chain, true));
        assert_eq!(torso.classify("LeatherVest"), (MaterialClass::Leather, true));
        assert_eq!(torso.classify("PlateLeatherHybrid"), (MaterialClass::Metal, true));
        assert_eq!(torso.classify("Shirt"), (MaterialClass::Cloth, false));
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(
            EquipmentSlot::Legs.classify("plateGREAVES").0,
            MaterialClass::Metal
        );
        assert_eq!(
            EquipmentSlot::Legs.classify("LEATHERpants").0,
            MaterialClass::Leather
        );
    }

    #[test]
    fn test_extremity_defaults_to_leather() {
        assert_eq!(EquipmentSlot::Feet.classify("Boots"), (MaterialClass::Leather, false));
        assert_eq!(EquipmentSlot::Feet.classify("ClothShoes").0, MaterialClass::Cloth);
        assert_eq!(EquipmentSlot::Hands.classify("Gloves").0, MaterialClass::Leather);
    }

    #[test]
    fn test_equipment_name_parse() {
        let parsed = EquipmentName::parse("Torso_PlateArmor").unwrap();
        assert_eq!(parsed.slot, EquipmentSlot::Torso);
        assert_eq!(parsed.type_name, "PlateArmor");
        assert_eq!(parsed.material(), MaterialClass::Metal);

        let second_token = EquipmentName::parse("Feet_Leather_Boots").unwrap();
        assert_eq!(second_token.type_name, "Leather");

        assert!(EquipmentName::parse("SwordBlade").is_none());
        assert!(EquipmentName::parse("Tail_Fur").is_none());
        assert!(EquipmentName::parse("Torso_").is_none());
    }

    #[test]
    fn test_is_none_type() {
        assert!(is_none_type("None"));
        assert!(is_none_type("none"));
        assert!(is_none_type(""));
        assert!(!is_none_type("PlateArmor"));
    }

    #[test]
    fn test_part_material() {
        assert_eq!(MaterialClass::for_part_name("SwordBlade"), MaterialClass::Metal);
        assert_eq!(MaterialClass::for_part_name("SpearHead"), MaterialClass::Metal);
        assert_eq!(MaterialClass::for_part_name("SpearShaft"), MaterialClass::Wood);
        assert_eq!(MaterialClass::for_part_name("ShieldHandle"), MaterialClass::Wood);
        assert_eq!(MaterialClass::for_part_name("SwordHilt"), MaterialClass::Leather);
    }
}
