use crate::answer_set::AnswerSet;
use crate::config::EngineConfig;
use asp_core::{AspProgram, Registry};
use asp_grounding::{check_program_safety, Instantiator, SafetyError};
use asp_parser::{load_program, LoadError, SrcId};
use asp_solver::{AsynchronousModelGenerator, GroundAspSolver, ModelGenerator};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Safety(#[from] SafetyError),
}

/// Parses, grounds and solves programs over one registry
pub struct Engine {
    config: EngineConfig,
    registry: Registry,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            config,
            registry: Registry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn load(&mut self, text: &str) -> Result<AspProgram, EngineError> {
        self.load_named(text, SrcId::empty())
    }

    pub fn load_named(&mut self, text: &str, src: SrcId) -> Result<AspProgram, EngineError> {
        let program = load_program(text, src, &mut self.registry)?;
        log::debug!(
            "loaded {} facts and {} rules from {}",
            program.edb.len(),
            program.idb.len(),
            src
        );
        Ok(program)
    }

    pub fn ground(&mut self, program: &AspProgram) -> Result<AspProgram, EngineError> {
        if self.config.check_safety {
            check_program_safety(&self.registry, program)?;
        }
        let ground = Instantiator::ground(&mut self.registry, program, &self.config.grounding);
        log::info!(
            "grounded into {} facts and {} rules",
            ground.edb.len(),
            ground.idb.len()
        );
        Ok(ground)
    }

    /// Model generator for a ground program
    pub fn models(&mut self, ground: &AspProgram) -> Box<dyn ModelGenerator> {
        let solver = GroundAspSolver::new(&mut self.registry, ground);
        match self.config.queue_capacity {
            Some(capacity) => Box::new(AsynchronousModelGenerator::new(solver, capacity)),
            None => Box::new(solver),
        }
    }

    /// Load, ground and solve a program, collecting its answer sets
    pub fn answer_sets(&mut self, text: &str) -> Result<Vec<AnswerSet>, EngineError> {
        let program = self.load(text)?;
        let ground = self.ground(&program)?;
        let mut models = self.models(&ground);
        let limit = self.config.max_models.unwrap_or(usize::MAX);

        let mut answer_sets = Vec::new();
        while answer_sets.len() < limit {
            match models.next_model() {
                Some(model) => answer_sets.push(AnswerSet::new(&self.registry, model)),
                None => break,
            }
        }
        log::debug!("{}", models.statistics());
        Ok(answer_sets)
    }

    /// The ground program of `text` in ASP syntax
    pub fn ground_text(&mut self, text: &str) -> Result<String, EngineError> {
        let program = self.load(text)?;
        let ground = self.ground(&program)?;
        Ok(ground.to_asp_string(&self.registry))
    }
}
