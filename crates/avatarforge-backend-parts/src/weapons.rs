//! Hand-held arsenal parts in hand-local space.
//!
//! Every part carries `origin = Some(ZERO)`: the renderer parents it to the
//! hand joint named by [`AttachPoint::for_part`](avatarforge_spec::AttachPoint::for_part).

use avatarforge_spec::{BodyPartDescriptor, CapMode, MaterialClass, Recipe};
use glam::Vec3;

use crate::line::create_line;
use crate::slots::normalize_color;

/// Geometry of one arsenal sub-part.
struct PartShape {
    name: &'static str,
    start: Vec3,
    end: Vec3,
    samples: usize,
    radii: &'static [f32],
}

const SWORD: [PartShape; 3] = [
    PartShape {
        name: "SwordHilt",
        start: Vec3::new(0.0, -4.0, 0.0),
        end: Vec3::new(0.0, 6.0, 0.0),
        samples: 2,
        radii: &[1.2],
    },
    PartShape {
        name: "SwordGuard",
        start: Vec3::new(-6.0, 6.0, 0.0),
        end: Vec3::new(6.0, 6.0, 0.0),
        samples: 2,
        radii: &[1.0],
    },
    PartShape {
        name: "SwordBlade",
        start: Vec3::new(0.0, 6.0, 0.0),
        end: Vec3::new(0.0, 80.0, 0.0),
        samples: 4,
        radii: &[2.0, 0.2],
    },
];

const SPEAR: [PartShape; 2] = [
    PartShape {
        name: "SpearShaft",
        start: Vec3::new(0.0, -60.0, 0.0),
        end: Vec3::new(0.0, 120.0, 0.0),
        samples: 4,
        radii: &[1.5],
    },
    PartShape {
        name: "SpearHead",
        start: Vec3::new(0.0, 120.0, 0.0),
        end: Vec3::new(0.0, 140.0, 0.0),
        samples: 3,
        radii: &[2.5, 0.1],
    },
];

const SHIELD: [PartShape; 2] = [
    PartShape {
        name: "ShieldPlate",
        start: Vec3::new(0.0, 0.0, -1.0),
        end: Vec3::new(0.0, 0.0, 2.0),
        samples: 2,
        radii: &[25.0, 23.0],
    },
    PartShape {
        name: "ShieldHandle",
        start: Vec3::new(-5.0, 0.0, -3.0),
        end: Vec3::new(5.0, 0.0, -3.0),
        samples: 2,
        radii: &[0.8],
    },
];

fn build<'a>(
    shapes: &'a [PartShape],
    recipe: &'a Recipe,
) -> impl Iterator<Item = BodyPartDescriptor> + 'a {
    shapes.iter().map(move |shape| {
        let color = normalize_color(recipe.color_for(MaterialClass::for_part_name(shape.name)));
        BodyPartDescriptor::tube(
            shape.name,
            create_line(shape.start, shape.end, shape.samples),
            shape.radii.to_vec(),
            color,
        )
        .with_origin(Vec3::ZERO)
        .with_cap_mode(CapMode::Both)
    })
}

/// Builds the parts for every weapon the recipe enables, sword, spear, then shield.
pub fn generate_weapons(recipe: &Recipe) -> Vec<BodyPartDescriptor> {
    let mut parts = Vec::new();
    if recipe.has_sword {
        parts.extend(build(&SWORD, recipe));
    }
    if recipe.has_spear {
        parts.extend(build(&SPEAR, recipe));
    }
    if recipe.has_shield {
        parts.extend(build(&SHIELD, recipe));
    }
    parts
}
