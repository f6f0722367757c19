use thiserror::Error;

use crate::ecs::{EntityHandle, EntityId};

/// Caller-correctable failures raised by worlds, entities and the application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("entity {entity} has no `{component}` component")]
    ComponentNotFound {
        entity: EntityId,
        component: &'static str,
    },
    #[error("entity {entity} already has a `{component}` component")]
    DuplicateComponent {
        entity: EntityId,
        component: &'static str,
    },
    #[error("entity {entity} is not owned by this world")]
    EntityNotOwned { entity: EntityHandle },
    #[error("no `{system}` system in this world")]
    SystemNotFound { system: &'static str },
    #[error("no `{component}` application component")]
    ApplicationComponentNotFound { component: &'static str },
    #[error("no world at index {index}")]
    WorldNotFound { index: usize },
}

pub type EcsResult<T> = Result<T, EcsError>;
