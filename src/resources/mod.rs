//! Resource definitions, recipes and the interned registry

pub mod definition;
pub mod registry;

pub use definition::{
    InfrastructureRequirement, Recipe, RecipeInput, RecipeInputSpec, RecipeSpec,
    ResourceCategory, ResourceDefinition, ResourceSpec,
};
pub use registry::ResourceRegistry;
