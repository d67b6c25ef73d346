//! End-to-end tests: recipe -> descriptors -> garments on the synthetic body.

use avatarforge_backend_garment::lint::is_valid;
use avatarforge_backend_garment::rim::boundary_vertices;
use std::sync::Arc;

use avatarforge_backend_garment::{
    check_skinning, extract_garment, smooth, thicken_rim, AvatarSession, BaseMesh,
    ExtractionParams, GarmentMaterial, GarmentMesh, RegionId, RegionSet, VertexClassification,
};
use avatarforge_backend_parts::solve;
use avatarforge_spec::{BodyStyle, EquipmentSlot, MaterialClass, Recipe, SkeletalJoint, Skeleton};
use avatarforge_tests::fixtures::{
    icosphere, joints, open_tube, radial_distance, radial_noise, rigid_garment, BodyFixture, TORSO_RADIUS,
};
use glam::Vec3;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn plate_armor_recipe() -> Recipe {
    Recipe {
        torso_slot: "PlateArmor".to_string(),
        metal_color: "#C0C0C0".to_string(),
        ..Default::default()
    }
}

fn full_outfit() -> Recipe {
    Recipe {
        body_style: BodyStyle::Limbs,
        joint_fill: true,
        has_sword: true,
        has_shield: true,
        ..Default::default()
    }
    .with_slot(EquipmentSlot::Head, "PlateHelm")
    .with_slot(EquipmentSlot::Shoulders, "PlatePauldrons")
    .with_slot(EquipmentSlot::Torso, "ChainShirt")
    .with_slot(EquipmentSlot::Arms, "LeatherBracers")
    .with_slot(EquipmentSlot::Hands, "LeatherGloves")
    .with_slot(EquipmentSlot::Legs, "ClothPants")
    .with_slot(EquipmentSlot::Feet, "PlateBoots")
}

#[test]
fn plate_armor_recipe_yields_single_marker() {
    init_logging();
    let parts = solve(&plate_armor_recipe());
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].name, "Torso_PlateArmor");
    assert_eq!(parts[0].color, "#C0C0C0");
    assert!(parts[0].path.is_empty());
}

#[test]
fn plate_armor_floats_off_the_torso() {
    init_logging();
    let marker = solve(&plate_armor_recipe()).remove(0);
    let equipment = marker.equipment().expect("torso marker parses");
    assert_eq!(equipment.material(), MaterialClass::Metal);

    let mesh = BodyFixture::humanoid().to_base_mesh();
    let classification = VertexClassification::classify(&mesh);
    let params = ExtractionParams::new(RegionSet::new(&[RegionId::Torso]), 5.0);
    let buffers = extract_garment(&mesh, &classification, &params).expect("torso has triangles");

    let mut garment = GarmentMesh::new(
        GarmentMesh::scene_name(equipment.slot, &equipment.type_name),
        equipment.slot,
        GarmentMaterial::new(equipment.material(), &marker.color),
        buffers,
        mesh.skeleton().clone(),
    );
    smooth(&mut garment, 2, 0.5);
    let moved = thicken_rim(&mut garment, 5.0, 0.3, 1.0);

    assert_eq!(garment.name, "armor_Torso_PlateArmor");
    assert!(garment.triangle_count() > 0);
    assert_eq!(moved, 2 * 16);
    for (i, p) in garment.buffers.positions.iter().enumerate() {
        let source = mesh.positions[garment.buffers.source_vertices[i] as usize];
        assert!(
            radial_distance(*p) > radial_distance(source),
            "vertex {} at {} is not outside its source at {}",
            i,
            radial_distance(*p),
            radial_distance(source)
        );
    }
    assert!(is_valid(&check_skinning(&garment)));
}

#[test]
fn extracted_torso_keeps_source_skinning() {
    let mesh = BodyFixture::humanoid().to_base_mesh();
    let classification = VertexClassification::classify(&mesh);
    let params = ExtractionParams::new(RegionSet::new(&[RegionId::Torso]), 2.5);
    let buffers = extract_garment(&mesh, &classification, &params).unwrap();

    for (i, &source) in buffers.source_vertices.iter().enumerate() {
        let source = source as usize;
        assert_eq!(buffers.joint_indices[i], mesh.joint_indices[source]);
        assert_eq!(buffers.joint_weights[i], mesh.joint_weights[source]);
        assert_eq!(classification.regions[source], RegionId::Torso);
    }
    assert!(buffers
        .positions
        .iter()
        .all(|p| (radial_distance(*p) - (TORSO_RADIUS + 2.5)).abs() < 0.2));
}

#[test]
fn full_outfit_builds_every_slot_in_order() {
    init_logging();
    let mut session = AvatarSession::new();
    session.load_base(BodyFixture::humanoid().to_snapshot()).unwrap();
    let garments = session.apply_recipe(&full_outfit()).unwrap();

    let names: Vec<&str> = garments.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "armor_Head_PlateHelm",
            "armor_Shoulders_PlatePauldrons",
            "armor_Torso_ChainShirt",
            "armor_Arms_LeatherBracers",
            "armor_Hands_LeatherGloves",
            "armor_Legs_ClothPants",
            "armor_Feet_PlateBoots",
        ]
    );
    for garment in garments {
        assert!(garment.triangle_count() > 0, "{}", garment.name);
        assert!(is_valid(&check_skinning(garment)), "{}", garment.name);
    }

    let torso = &garments[2];
    assert_eq!(torso.material.class, MaterialClass::Chain);
    assert_eq!(torso.material.color, "#7D7F83");
}

#[test]
fn boots_are_clipped_at_the_knee() {
    let mut session = AvatarSession::new();
    let base = session.load_base(BodyFixture::humanoid().to_snapshot()).unwrap();
    let source_positions = base.mesh.positions.clone();

    let recipe = Recipe::default().with_slot(EquipmentSlot::Feet, "LeatherBoots");
    let garments = session.apply_recipe(&recipe).unwrap();
    assert_eq!(garments.len(), 1);
    for &source in &garments[0].buffers.source_vertices {
        assert!(source_positions[source as usize].y <= 45.0);
    }
}

#[test]
fn gloves_cover_only_the_hands() {
    let mut session = AvatarSession::new();
    session.load_base(BodyFixture::humanoid().to_snapshot()).unwrap();
    let recipe = Recipe::default().with_slot(EquipmentSlot::Hands, "LeatherGloves");
    session.apply_recipe(&recipe).unwrap();
    let gloves = &session.garments()[0];

    let base = session.base().unwrap();
    for &source in &gloves.buffers.source_vertices {
        let dominant = base.classification.dominant[source as usize].map(|j| j as u32);
        assert!(
            dominant == Some(joints::LEFT_HAND) || dominant == Some(joints::RIGHT_HAND),
            "vertex dominated by {:?}",
            dominant
        );
    }
}

#[test]
fn bracers_exclude_hands() {
    let mut session = AvatarSession::new();
    session.load_base(BodyFixture::humanoid().to_snapshot()).unwrap();
    let recipe = Recipe::default().with_slot(EquipmentSlot::Arms, "LeatherBracers");
    session.apply_recipe(&recipe).unwrap();

    let base = session.base().unwrap();
    for &source in &session.garments()[0].buffers.source_vertices {
        let dominant = base.classification.dominant[source as usize].map(|j| j as u32);
        assert!(dominant != Some(joints::LEFT_HAND) && dominant != Some(joints::RIGHT_HAND));
    }
}

#[test]
fn smoothing_reduces_icosphere_noise() {
    let (positions, indices) = icosphere(2, 1.0);
    let mut garment = rigid_garment(radial_noise(&positions, 0.05), indices);

    let centroid = |ps: &[Vec3]| ps.iter().copied().sum::<Vec3>() / ps.len() as f32;
    let variance = |ps: &[Vec3]| {
        let c = centroid(ps);
        let d: Vec<f32> = ps.iter().map(|p| p.distance(c)).collect();
        let mean = d.iter().sum::<f32>() / d.len() as f32;
        d.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / d.len() as f32
    };

    let before = variance(&garment.buffers.positions);
    let centroid_before = centroid(&garment.buffers.positions);
    smooth(&mut garment, 1, 0.5);

    assert!(variance(&garment.buffers.positions) < before);
    assert!(centroid(&garment.buffers.positions).distance(centroid_before) < 1e-4);
}

#[test]
fn rim_moves_only_end_rings_of_open_tube() {
    let (positions, indices) = open_tube(5, 12);
    let mut garment = rigid_garment(positions.clone(), indices);

    let rim = boundary_vertices(&garment.buffers.indices);
    assert_eq!(rim.len(), 24);

    thicken_rim(&mut garment, 1.0, 0.3, 1.0);
    for (i, (before, after)) in positions.iter().zip(garment.buffers.positions.iter()).enumerate() {
        let end_ring = i < 12 || i >= 48;
        assert_eq!(end_ring, rim.contains(&(i as u32)));
        if end_ring {
            assert!(radial_distance(*after) > 1.25, "vertex {}", i);
        } else {
            assert_eq!(before, after, "vertex {}", i);
        }
    }
}

/// One torso triangle on the spine and one finger triangle on Rigify
/// finger and palm bones.
fn rigify_hand_mesh() -> BaseMesh {
    let skeleton = Skeleton::new(vec![
        SkeletalJoint::new("DEF-spine", -1, Vec3::new(0.0, 100.0, 0.0)),
        SkeletalJoint::new("DEF-upper_arm.L", 0, Vec3::new(18.0, 40.0, 0.0)),
        SkeletalJoint::new("DEF-hand.L", 1, Vec3::new(52.0, 0.0, 0.0)),
        SkeletalJoint::new("DEF-f_index.01.L", 2, Vec3::new(8.0, 0.0, 0.0)),
        SkeletalJoint::new("DEF-palm.01.L", 2, Vec3::new(3.0, 0.0, 0.0)),
    ])
    .unwrap();
    let rigid = |joint: u32| ([joint, 0, 0, 0], [1.0, 0.0, 0.0, 0.0]);
    let bindings = [rigid(0), rigid(0), rigid(0), rigid(3), rigid(3), rigid(4)];

    BaseMesh::new(
        vec![
            Vec3::new(-10.0, 100.0, 10.0),
            Vec3::new(10.0, 100.0, 10.0),
            Vec3::new(0.0, 130.0, 10.0),
            Vec3::new(78.0, 140.0, 0.0),
            Vec3::new(84.0, 140.0, 0.0),
            Vec3::new(80.0, 144.0, 0.0),
        ],
        vec![0, 1, 2, 3, 4, 5],
        bindings.iter().map(|b| b.0).collect(),
        bindings.iter().map(|b| b.1).collect(),
        None,
        Arc::new(skeleton),
    )
    .unwrap()
}

#[test]
fn rigify_finger_bones_go_to_gloves_not_torso_armor() {
    init_logging();
    let mut session = AvatarSession::new();
    let base = session.load_base_mesh(rigify_hand_mesh());
    assert_eq!(
        base.classification.regions,
        vec![
            RegionId::Torso,
            RegionId::Torso,
            RegionId::Torso,
            RegionId::LeftArm,
            RegionId::LeftArm,
            RegionId::LeftArm,
        ]
    );

    let recipe = Recipe::default()
        .with_slot(EquipmentSlot::Torso, "PlateArmor")
        .with_slot(EquipmentSlot::Hands, "LeatherGloves");
    let garments = session.apply_recipe(&recipe).unwrap();
    assert_eq!(garments.len(), 2);
    assert_eq!(garments[0].name, "armor_Torso_PlateArmor");
    assert_eq!(garments[0].buffers.source_vertices, vec![0, 1, 2]);
    assert_eq!(garments[1].name, "armor_Hands_LeatherGloves");
    assert_eq!(garments[1].buffers.source_vertices, vec![3, 4, 5]);
}
