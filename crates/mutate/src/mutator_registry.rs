use crate::{
    MutateConfig, MutateError, Mutation, Result, SourceFile,
    mutators::{
        MutationContext, Mutator,
        arithmetic_duplication_mutator::ArithmeticDuplicationMutator,
        delegatecall_mutator::DelegatecallMutator,
        external_call_mutator::{
            ExternalCallReplacementMutator, GasLimitMutator, ReturnValueMutator,
        },
        injection_mutator::{
            FallbackMutator, PublicGetterMutator, ReentrantCallMutator, UnencryptedStorageMutator,
        },
        input_mutator::{InputRangeMutator, NullValueMutator},
        integer_overflow_mutator::IntegerOverflowMutator,
        locking_ether_mutator::LockingEtherMutator,
        randomness_mutator::{BlockhashMutator, RandomnessSourceMutator},
        reentrancy_mutator::{OrderSwapMutator, ReentrancyMutator},
        timestamp_mutator::{
            TimestampComparisonMutator, TimestampDependencyMutator, TimestampManipulationMutator,
        },
        unchecked_call_mutator::UncheckedCallMutator,
        unused_return_mutator::{
            UnusedReturnAssignMutator, UnusedReturnDropMutator, UnusedReturnNestedMutator,
        },
    },
};
use rayon::prelude::*;

/// Registry of all available mutators (ie implementing the Mutator trait)
pub struct MutatorRegistry {
    mutators: Vec<Box<dyn Mutator>>,
}

impl MutatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { mutators: Vec::new() }
    }

    pub fn with_mutator(mut self, mutator: impl Mutator + 'static) -> Self {
        self.mutators.push(Box::new(mutator));
        self
    }

    /// Every mutator, in catalogue order.
    pub fn all() -> Self {
        let mutators: Vec<Box<dyn Mutator>> = vec![
            Box::new(IntegerOverflowMutator),
            Box::new(LockingEtherMutator),
            Box::new(ReentrancyMutator),
            Box::new(OrderSwapMutator),
            Box::new(TimestampDependencyMutator),
            Box::new(TimestampComparisonMutator),
            Box::new(TimestampManipulationMutator),
            Box::new(RandomnessSourceMutator),
            Box::new(BlockhashMutator),
            Box::new(UnusedReturnAssignMutator),
            Box::new(UnusedReturnDropMutator),
            Box::new(UnusedReturnNestedMutator),
            Box::new(UncheckedCallMutator),
            Box::new(DelegatecallMutator),
            Box::new(GasLimitMutator),
            Box::new(ReturnValueMutator),
            Box::new(ExternalCallReplacementMutator),
            Box::new(NullValueMutator),
            Box::new(InputRangeMutator),
            Box::new(PublicGetterMutator),
            Box::new(UnencryptedStorageMutator),
            Box::new(FallbackMutator),
            Box::new(ReentrantCallMutator),
            Box::new(ArithmeticDuplicationMutator),
        ];
        Self { mutators }
    }

    /// The mutators selected by `config`. Ids naming no registered mutator are an error.
    pub fn from_config(config: &MutateConfig) -> Result<Self> {
        let mut registry = Self::all();
        if let Some(unknown) = config
            .named_mutators()
            .find(|id| !registry.mutators.iter().any(|m| m.id().eq_ignore_ascii_case(id)))
        {
            return Err(MutateError::UnknownMutator(unknown.to_string()));
        }
        registry.mutators.retain(|mutator| config.is_enabled(mutator.id()));
        debug!(mutators = ?registry.ids(), "selected mutators");
        Ok(registry)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.mutators.iter().map(|mutator| mutator.id()).collect()
    }

    /// `(id, name)` of every registered mutator.
    pub fn descriptors(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.mutators.iter().map(|mutator| (mutator.id(), mutator.name()))
    }

    pub fn len(&self) -> usize {
        self.mutators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutators.is_empty()
    }

    /// Find all applicable mutators for a given context and return the corresponding mutations
    pub fn generate_mutations(&self, context: &MutationContext<'_>) -> Vec<Mutation> {
        self.mutators
            .iter()
            .filter(|mutator| mutator.is_applicable(context))
            .flat_map(|mutator| {
                let mutants = mutator.generate_mutants(context);
                debug!(
                    mutator = mutator.id(),
                    file = %context.path.display(),
                    count = mutants.len(),
                    "generated mutants"
                );
                mutants
            })
            .collect()
    }

    /// All mutations of one file.
    pub fn run_file(&self, file: &SourceFile, seed: Option<u64>) -> Vec<Mutation> {
        let mutations = self.generate_mutations(&file.context(seed));
        info!(file = %file.path().display(), count = mutations.len(), "mutated file");
        mutations
    }

    /// All mutations of `files`, processed in parallel and concatenated in input order.
    pub fn run(&self, files: &[SourceFile], seed: Option<u64>) -> Vec<Mutation> {
        files.par_iter().flat_map_iter(|file| self.run_file(file, seed)).collect()
    }
}

impl Default for MutatorRegistry {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_short() {
        let registry = MutatorRegistry::all();
        let ids = registry.ids();
        assert_eq!(ids.len(), 24);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len(), "duplicate ids: {ids:?}");
        for id in ids {
            assert!((2..=5).contains(&id.len()), "{id}");
            assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()), "{id}");
        }
    }

    #[test]
    fn selects_from_config() {
        let config = MutateConfig {
            mutators: vec!["re".into(), "ROS".into(), "GL".into()],
            skip_mutators: vec!["GL".into()],
            ..Default::default()
        };
        let registry = MutatorRegistry::from_config(&config).unwrap();
        assert_eq!(registry.ids(), ["RE", "ROS"]);
    }

    #[test]
    fn rejects_unknown_ids() {
        let config = MutateConfig { skip_mutators: vec!["NOPE".into()], ..Default::default() };
        let err = MutatorRegistry::from_config(&config).err().unwrap();
        assert!(matches!(err, MutateError::UnknownMutator(ref id) if id == "NOPE"), "{err}");
    }

    #[test]
    fn describes_catalogue() {
        let registry = MutatorRegistry::new().with_mutator(IntegerOverflowMutator);
        let descriptors: Vec<_> = registry.descriptors().collect();
        assert_eq!(descriptors, [("IUO", "integer-underflow-overflow")]);
    }
}
