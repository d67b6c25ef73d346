//! Render material handed to the renderer with each garment.

use avatarforge_spec::{Color, MaterialClass};
use serde::{Deserialize, Serialize};

/// Flat material description for a garment or tube part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentMaterial {
    pub class: MaterialClass,
    /// Uppercase `#RRGGBB`.
    pub color: String,
    /// Specular intensity, 0.0 to 1.0.
    pub specular: f32,
    /// Specular exponent.
    pub specular_power: f32,
    /// Depth bias so overlays win against the skin they sit on.
    pub z_offset: f32,
}

impl GarmentMaterial {
    /// Builds the material for a class and color.
    ///
    /// Unparseable colors fall back to mid grey.
    pub fn new(class: MaterialClass, color: &str) -> Self {
        let (specular, specular_power) = match class {
            MaterialClass::Metal | MaterialClass::Chain => (1.0, 64.0),
            MaterialClass::Leather => (0.5, 32.0),
            MaterialClass::Cloth => (0.0, 0.0),
            MaterialClass::Wood => (0.1, 4.0),
            MaterialClass::Skin => (0.3, 8.0),
        };
        let color = match Color::from_hex(color) {
            Some(parsed) => parsed.to_hex(),
            None => {
                log::warn!("garment color '{}' is not #RRGGBB, using grey", color);
                Color::rgb(0.5, 0.5, 0.5).to_hex()
            }
        };
        Self {
            class,
            color,
            specular,
            specular_power,
            z_offset: if class == MaterialClass::Skin { 0.0 } else { -1.0 },
        }
    }

    /// Diffuse color as linear f32 components.
    pub fn diffuse(&self) -> [f32; 3] {
        Color::from_hex(&self.color)
            .map(|c| c.to_f32_array())
            .unwrap_or([0.5; 3])
    }
}
