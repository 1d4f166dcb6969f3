use bevy_ecs::component::Component;

#[derive(Component)]
pub struct GlobeComponent;

/// Entities carrying this are drawn with the globe group's rotation applied
/// on top of `local_matrix`.
#[derive(Component)]
pub struct GroupTransformComponent {
    pub local_matrix: cgmath::Matrix4<f32>,
}
