//! Effect document → emitter records.
//!
//! Decoding is lenient: a missing module element or attribute keeps the
//! [`EmitterRecord`] default for that field, and malformed curve channels fall
//! back to the default channel.

use crate::document::{DocElement, DocumentError, read_channel, tags};
use crate::record::{
    DEFAULT_TEXTURE, EmitterRecord, EmitterShape, MAX_ATTRACTORS, PointAttractor, ShapeKind,
};

/// One record per `EmitterData` element, in document order.
pub fn records_from_document(root: &DocElement) -> Result<Vec<EmitterRecord>, DocumentError> {
    if root.tag != tags::PARTICLE_SYSTEM {
        return Err(DocumentError::UnexpectedRoot {
            expected: tags::PARTICLE_SYSTEM,
            found: root.tag.clone(),
        });
    }
    Ok(root
        .children_named(tags::EMITTER_DATA)
        .map(record_from_element)
        .collect())
}

/// Decode a single `EmitterData` element.
pub fn record_from_element(element: &DocElement) -> EmitterRecord {
    let mut record = EmitterRecord::default();
    record.name = element.attr_or("name", record.name);
    record.stop_render = element.attr_or("stopRender", record.stop_render);

    if let Some(base) = element.child(tags::BASE) {
        read_base(base, &mut record);
    }
    if let Some(emission) = element.child(tags::EMISSION) {
        read_emission(emission, &mut record);
    }
    if let Some(shape) = element.child(tags::SHAPE) {
        record.shape = read_shape(shape);
    }
    if let Some(size) = element.child(tags::SIZE_OVER_LIFETIME) {
        read_size(size, &mut record);
    }
    if let Some(velocity) = element.child(tags::VELOCITY_OVER_LIFETIME) {
        read_velocity(velocity, &mut record);
    }
    if let Some(orbital) = element.child(tags::ORBITAL_VELOCITY_OVER_LIFETIME) {
        read_orbital(orbital, &mut record);
    }
    if let Some(rotation) = element.child(tags::ROTATION_OVER_LIFETIME) {
        record.rotation_modifier = rotation.attr_or("modifier", record.rotation_modifier);
        record.rotation = read_channel(rotation);
    }
    if let Some(color) = element.child(tags::COLOR_OVER_LIFETIME) {
        record.color = read_channel(color);
    }
    if let Some(physics) = element.child(tags::PHYSICS) {
        record.point_attractors = physics
            .children_named(tags::POINT)
            .take(MAX_ATTRACTORS)
            .map(|point| {
                let default = PointAttractor::default();
                PointAttractor {
                    offset: point.attr_or("offset", default.offset),
                    strength: point.attr_or("strength", default.strength),
                }
            })
            .collect();
    }
    if let Some(renderer) = element.child(tags::RENDERER) {
        read_renderer(renderer, &mut record);
    }

    record
}

fn read_base(base: &DocElement, record: &mut EmitterRecord) {
    record.draw_order = base.attr_or("order", record.draw_order);
    record.offset = base.attr_or("offset", record.offset);
    record.max_particles = base.attr_or("maxParticles", record.max_particles);
    record.lifetime = base.attr_or("lifetime", record.lifetime);
    record.start_speed = base.attr_or("speed", record.start_speed);
    record.start_size = base.attr_or("size", record.start_size);
    record.start_rotation_degrees = base.attr_or("rotation", record.start_rotation_degrees);
    record.start_color = base.attr_or("startColor", record.start_color);
    record.gravity_scale = base.attr_or("gravity", record.gravity_scale);
    record.simulation_space = base.attr_or("simspace", record.simulation_space);
}

fn read_emission(emission: &DocElement, record: &mut EmitterRecord) {
    record.emission_mode = emission.attr_or("mode", record.emission_mode);
    record.emission_rate = emission.attr_or("emissionRate", record.emission_rate);
    record.burst_count = emission.attr_or("numBurstParticles", record.burst_count);
    record.burst_interval = emission.attr_or("burstInterval", record.burst_interval);
}

fn read_shape(shape: &DocElement) -> EmitterShape {
    let kind = shape.attr_or("shape", ShapeKind::default());
    match kind.default_shape() {
        EmitterShape::Cone { half_angle, forward } => EmitterShape::Cone {
            half_angle: shape.attr_or("coneHalfAngle", half_angle),
            forward: shape.attr_or("coneForward", forward),
        },
        EmitterShape::Sphere { radius, from_surface } => EmitterShape::Sphere {
            radius: shape.attr_or("sphereRadius", radius),
            from_surface: shape.attr_or("fromSurface", from_surface),
        },
        EmitterShape::Box { dimensions, forward } => EmitterShape::Box {
            dimensions: shape.attr_or("boxDimensions", dimensions),
            forward: shape.attr_or("boxForward", forward),
        },
    }
}

fn read_size(size: &DocElement, record: &mut EmitterRecord) {
    if let Some(x) = size.child(tags::SIZE_X) {
        record.size_x_modifier = x.attr_or("modifier", record.size_x_modifier);
        record.size_x = read_channel(x);
    }
    if let Some(y) = size.child(tags::SIZE_Y) {
        record.size_y_modifier = y.attr_or("modifier", record.size_y_modifier);
        record.size_y = read_channel(y);
    }
}

fn read_velocity(velocity: &DocElement, record: &mut EmitterRecord) {
    record.velocity_modifier = velocity.attr_or("modifier", record.velocity_modifier);
    if let Some(x) = velocity.child(tags::VELOCITY_X) {
        record.velocity_x = read_channel(x);
    }
    if let Some(y) = velocity.child(tags::VELOCITY_Y) {
        record.velocity_y = read_channel(y);
    }
    if let Some(z) = velocity.child(tags::VELOCITY_Z) {
        record.velocity_z = read_channel(z);
    }
    if let Some(drag) = velocity.child(tags::DRAG) {
        record.drag_modifier = drag.attr_or("modifier", record.drag_modifier);
        record.drag = read_channel(drag);
    }
}

fn read_orbital(orbital: &DocElement, record: &mut EmitterRecord) {
    record.orbital_axis = orbital.attr_or("forward", record.orbital_axis);
    if let Some(velocity) = orbital.child(tags::ORBITAL_VELOCITY) {
        record.orbital_velocity_modifier = velocity.attr_or("modifier", record.orbital_velocity_modifier);
        record.orbital_velocity = read_channel(velocity);
    }
    if let Some(radius) = orbital.child(tags::ORBITAL_RADIUS) {
        record.orbital_radius_modifier = radius.attr_or("modifier", record.orbital_radius_modifier);
        record.orbital_radius = read_channel(radius);
    }
}

fn read_renderer(renderer: &DocElement, record: &mut EmitterRecord) {
    record.render_mode = renderer.attr_or("mode", record.render_mode);
    record.texture = renderer
        .attr_text("texture")
        .filter(|texture| !texture.is_empty())
        .unwrap_or(DEFAULT_TEXTURE)
        .to_string();
    record.sprite_sheet = renderer.attr_or("isSpriteSheet", record.sprite_sheet);
    record.sprite_grid = renderer.attr_or("dimensions", record.sprite_grid);
    record.blend_mode = renderer.attr_or("blend", record.blend_mode);
    record.sort_particles = renderer.attr_or("sortParticles", record.sort_particles);
}
