//! Effect registry for managing available effects
//!
//! The registry holds all registered effect descriptors and owns the budget
//! admission check used before a post-process effect joins the stack.

use std::collections::HashMap;

use super::types::{EffectCategory, EffectDescriptor, EffectVariant};

/// Default maximum number of simultaneously active effects
pub const MAX_STACK: usize = 6;

/// Default maximum aggregate cost weight
pub const MAX_BUDGET: f32 = 6.0;

/// Limits applied by `EffectRegistry::can_admit`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetPolicy {
    /// Maximum number of active effects
    pub max_stack: usize,
    /// Maximum summed cost weight
    pub max_budget: f32,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            max_stack: MAX_STACK,
            max_budget: MAX_BUDGET,
        }
    }
}

/// Why a candidate effect was refused
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BudgetRejection {
    #[error("Maximum {max} effects allowed")]
    StackFull { max: usize },
    #[error("Budget exceeded ({total_cost:.1}/{max_budget})")]
    BudgetExceeded { total_cost: f32, max_budget: f32 },
}

impl BudgetRejection {
    /// Computed total, when the rejection came from the cost check
    pub fn total_cost(&self) -> Option<f32> {
        match self {
            BudgetRejection::StackFull { .. } => None,
            BudgetRejection::BudgetExceeded { total_cost, .. } => Some(*total_cost),
        }
    }
}

/// Result of an admission check
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// Candidate may be added; the total is reported when a cost was computed
    Allowed { total_cost: Option<f32> },
    /// Candidate must not be added
    Rejected(BudgetRejection),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed { .. })
    }

    /// Human-readable rejection reason
    pub fn reason(&self) -> Option<String> {
        match self {
            Admission::Allowed { .. } => None,
            Admission::Rejected(rejection) => Some(rejection.to_string()),
        }
    }

    pub fn total_cost(&self) -> Option<f32> {
        match self {
            Admission::Allowed { total_cost } => *total_cost,
            Admission::Rejected(rejection) => rejection.total_cost(),
        }
    }
}

/// Registry of available effects
///
/// Descriptors are registered at startup. The registry is immutable once it is
/// handed to the rest of the application, so it is shared behind an `Arc`.
pub struct EffectRegistry {
    /// Descriptors by id
    effects: HashMap<String, EffectDescriptor>,
    /// Ids in registration order
    order: Vec<String>,
    /// Admission limits
    policy: BudgetPolicy,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Create a new empty registry with default limits
    pub fn new() -> Self {
        Self::with_policy(BudgetPolicy::default())
    }

    /// Create a new empty registry with the given limits
    pub fn with_policy(policy: BudgetPolicy) -> Self {
        Self {
            effects: HashMap::new(),
            order: Vec::new(),
            policy,
        }
    }

    /// Create a registry populated with the built-in catalog
    pub fn with_builtins(policy: BudgetPolicy) -> Self {
        let mut registry = Self::with_policy(policy);
        super::builtin::register_builtin_effects(&mut registry);
        tracing::debug!(count = registry.len(), "Effect registry populated");
        registry
    }

    /// Register a descriptor, replacing any existing entry with the same id
    pub fn register(&mut self, mut descriptor: EffectDescriptor) {
        if descriptor.is_material() {
            descriptor.stackable = false;
        }
        let id = descriptor.id.clone();
        if self.effects.insert(id.clone(), descriptor).is_some() {
            tracing::warn!(id = %id, "Replacing already registered effect");
        } else {
            self.order.push(id);
        }
    }

    /// Register a base descriptor followed by each composed variant
    pub fn register_with_variants(&mut self, base: EffectDescriptor, variants: &[EffectVariant]) {
        let composed: Vec<EffectDescriptor> = variants.iter().map(|v| base.with_variant(v)).collect();
        self.register(base);
        for descriptor in composed {
            self.register(descriptor);
        }
    }

    /// Get a descriptor by id
    pub fn get(&self, id: &str) -> Option<&EffectDescriptor> {
        self.effects.get(id)
    }

    /// Check if an id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.effects.contains_key(id)
    }

    /// Ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.order.iter().filter_map(|id| self.effects.get(id))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn policy(&self) -> BudgetPolicy {
        self.policy
    }

    /// Non-variant descriptors of a category, sorted by `ui_order`
    pub fn list_by_category(&self, category: EffectCategory) -> Vec<&EffectDescriptor> {
        let mut list: Vec<&EffectDescriptor> = self
            .descriptors()
            .filter(|d| d.category == category && !d.is_variant())
            .collect();
        list.sort_by(|a, b| a.ui_order.total_cmp(&b.ui_order));
        list
    }

    /// Find the descriptor bound to a keyboard shortcut
    pub fn by_shortcut(&self, key: char) -> Option<&EffectDescriptor> {
        self.descriptors().find(|d| d.shortcut == Some(key))
    }

    /// Decide whether `candidate_id` may join the active set.
    ///
    /// Greedy and stateless: disabling an active effect is always allowed, the
    /// count cap is checked next, then the summed tier weights.
    pub fn can_admit(&self, active_ids: &[&str], candidate_id: &str) -> Admission {
        if active_ids.contains(&candidate_id) {
            return Admission::Allowed { total_cost: None };
        }

        if active_ids.len() >= self.policy.max_stack {
            return Admission::Rejected(BudgetRejection::StackFull {
                max: self.policy.max_stack,
            });
        }

        let Some(candidate_tier) = self.get(candidate_id).and_then(|d| d.cost_tier) else {
            return Admission::Allowed { total_cost: None };
        };

        let total_cost = candidate_tier.weight()
            + active_ids
                .iter()
                .filter_map(|id| self.get(id))
                .map(|d| d.cost())
                .sum::<f32>();

        if total_cost > self.policy.max_budget {
            return Admission::Rejected(BudgetRejection::BudgetExceeded {
                total_cost,
                max_budget: self.policy.max_budget,
            });
        }

        Admission::Allowed {
            total_cost: Some(total_cost),
        }
    }
}
