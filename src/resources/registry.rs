//! Resource registry - validated, interned resource definitions
//!
//! Every resource name used anywhere in a scenario is resolved against this
//! registry once, at construction. Simulation code only ever handles
//! [`ResourceId`]s, so a misspelled name fails loudly at startup instead of
//! silently missing a lookup mid-turn.

use ahash::AHashMap;

use crate::core::error::{EconomyError, Result};
use crate::core::types::ResourceId;
use crate::resources::definition::{Recipe, RecipeInput, ResourceDefinition, ResourceSpec};

/// Catalog of all resources in a scenario
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    definitions: Vec<ResourceDefinition>,
    by_name: AHashMap<String, ResourceId>,
}

impl ResourceRegistry {
    /// Build a registry from scenario specs
    ///
    /// `default_volatility` applies to specs that leave volatility unset.
    pub fn new(specs: &[ResourceSpec], default_volatility: f64) -> Result<Self> {
        if specs.is_empty() {
            return Err(EconomyError::MissingResources);
        }
        if specs.len() > u16::MAX as usize {
            return Err(EconomyError::InvalidConfig(format!(
                "too many resources ({})",
                specs.len()
            )));
        }

        // First pass: intern names so recipes can reference any resource
        let mut by_name = AHashMap::with_capacity(specs.len());
        for (idx, spec) in specs.iter().enumerate() {
            spec.validate().map_err(EconomyError::InvalidConfig)?;
            if by_name
                .insert(spec.name.clone(), ResourceId(idx as u16))
                .is_some()
            {
                return Err(EconomyError::DuplicateResource(spec.name.clone()));
            }
        }

        // Second pass: resolve recipes
        let mut definitions = Vec::with_capacity(specs.len());
        for spec in specs {
            let recipe = match &spec.recipe {
                Some(recipe_spec) => {
                    let inputs = recipe_spec
                        .inputs
                        .iter()
                        .map(|input| {
                            let resource = by_name.get(&input.resource).copied().ok_or_else(|| {
                                EconomyError::UnknownResource {
                                    resource: input.resource.clone(),
                                    context: format!("recipe for {}", spec.name),
                                }
                            })?;
                            Ok(RecipeInput {
                                resource,
                                amount: input.amount,
                                consumed: input.consumed,
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;

                    Some(Recipe {
                        inputs,
                        output_amount: recipe_spec.output_amount,
                        requirement: recipe_spec.infrastructure.clone(),
                        efficiency: recipe_spec.efficiency,
                    })
                }
                None => None,
            };

            definitions.push(ResourceDefinition {
                name: spec.name.clone(),
                category: spec.category,
                base_value: spec.base_value,
                volatility: spec.volatility.unwrap_or(default_volatility),
                perish_rate: spec.perish_rate,
                transport_factor: spec.transport_factor,
                essential: spec.essential,
                consumption_per_labor: spec.consumption_per_labor,
                recipe,
            });
        }

        Ok(Self {
            definitions,
            by_name,
        })
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a resource id by name
    pub fn id(&self, name: &str) -> Option<ResourceId> {
        self.by_name.get(name).copied()
    }

    /// Look up an id, reporting the caller context on failure
    pub fn resolve(&self, name: &str, context: &str) -> Result<ResourceId> {
        self.id(name).ok_or_else(|| EconomyError::UnknownResource {
            resource: name.to_string(),
            context: context.to_string(),
        })
    }

    pub fn get(&self, id: ResourceId) -> Option<&ResourceDefinition> {
        self.definitions.get(id.index())
    }

    /// Name of a resource, or "?" for ids from another registry
    pub fn name(&self, id: ResourceId) -> &str {
        self.get(id).map(|d| d.name.as_str()).unwrap_or("?")
    }

    /// All ids in registry order
    pub fn ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        (0..self.definitions.len()).map(|idx| ResourceId(idx as u16))
    }

    /// All definitions in registry order
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &ResourceDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(idx, def)| (ResourceId(idx as u16), def))
    }

    /// Essential resources only
    pub fn essentials(&self) -> impl Iterator<Item = (ResourceId, &ResourceDefinition)> {
        self.iter().filter(|(_, def)| def.essential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::definition::{RecipeInputSpec, RecipeSpec};

    fn tools_recipe(input: &str) -> RecipeSpec {
        RecipeSpec {
            inputs: vec![RecipeInputSpec {
                resource: input.into(),
                amount: 2.0,
                consumed: true,
            }],
            output_amount: 1.0,
            infrastructure: None,
            efficiency: 1.0,
        }
    }

    #[test]
    fn test_registry_interns_names_in_order() {
        let registry = ResourceRegistry::new(
            &[ResourceSpec::raw("Food", 10.0), ResourceSpec::raw("Iron", 20.0)],
            0.2,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.id("Food"), Some(ResourceId(0)));
        assert_eq!(registry.id("Iron"), Some(ResourceId(1)));
        assert_eq!(registry.id("Gold"), None);
        assert_eq!(registry.name(ResourceId(1)), "Iron");
        assert_eq!(registry.name(ResourceId(9)), "?");
    }

    #[test]
    fn test_default_volatility_applied() {
        let registry = ResourceRegistry::new(
            &[
                ResourceSpec::raw("Food", 10.0),
                ResourceSpec::raw("Gems", 50.0).with_volatility(0.4),
            ],
            0.2,
        )
        .unwrap();

        assert!((registry.get(ResourceId(0)).unwrap().volatility - 0.2).abs() < 1e-9);
        assert!((registry.get(ResourceId(1)).unwrap().volatility - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_recipe_inputs_resolved() {
        let registry = ResourceRegistry::new(
            &[
                ResourceSpec::raw("Tools", 30.0).with_recipe(tools_recipe("Iron")),
                ResourceSpec::raw("Iron", 20.0),
            ],
            0.2,
        )
        .unwrap();

        let recipe = registry.get(ResourceId(0)).unwrap().recipe.as_ref().unwrap();
        assert_eq!(recipe.inputs[0].resource, ResourceId(1));
    }

    #[test]
    fn test_unknown_recipe_input_rejected() {
        let err = ResourceRegistry::new(
            &[ResourceSpec::raw("Tools", 30.0).with_recipe(tools_recipe("Iorn"))],
            0.2,
        )
        .unwrap_err();
        assert!(matches!(err, EconomyError::UnknownResource { .. }));
    }

    #[test]
    fn test_duplicate_and_empty_rejected() {
        let err = ResourceRegistry::new(
            &[ResourceSpec::raw("Food", 1.0), ResourceSpec::raw("Food", 2.0)],
            0.2,
        )
        .unwrap_err();
        assert!(matches!(err, EconomyError::DuplicateResource(_)));

        let err = ResourceRegistry::new(&[], 0.2).unwrap_err();
        assert!(matches!(err, EconomyError::MissingResources));
    }

    #[test]
    fn test_essentials_filter() {
        let registry = ResourceRegistry::new(
            &[
                ResourceSpec::raw("Food", 10.0).essential(0.5),
                ResourceSpec::raw("Iron", 20.0),
                ResourceSpec::raw("Water", 2.0).essential(1.0),
            ],
            0.2,
        )
        .unwrap();

        let names: Vec<&str> = registry.essentials().map(|(_, d)| d.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Water"]);
    }
}
