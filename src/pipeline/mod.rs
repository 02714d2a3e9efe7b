//! Personality ingestion pipeline
//!
//! Turns a free-text name into a registered, selected agent:
//!
//! ```text
//! Idle → LookingUp → InferringTrait → Synthesizing → Done
//!            ↓
//!         Failed(reason)
//! ```
//!
//! Lookup failures end the run. Inference failures never do; they fall back
//! to the uncertain voice pair. Only one run may be in flight at a time.

pub mod synthesis;

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

use crate::agent::voice::assign_voice;
use crate::agent::{Agent, AgentRegistry};
use crate::inference::{InferredCategory, TraitInferrer};
use crate::knowledge::{KnowledgeSource, LookupOutcome, PageSummary};

/// Where a run currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    LookingUp,
    InferringTrait,
    Synthesizing,
    Done { agent_id: String },
    Failed { reason: String },
}

impl PipelineState {
    /// Progress line shown while a run is busy
    pub fn progress_message(&self) -> Option<&'static str> {
        match self {
            PipelineState::LookingUp => Some("Buscando informações na Wikipedia..."),
            PipelineState::InferringTrait => Some("Analisando informações para voz..."),
            PipelineState::Synthesizing => Some("Criando avatar..."),
            PipelineState::Idle | PipelineState::Done { .. } | PipelineState::Failed { .. } => None,
        }
    }
}

/// Run failures; `Display` is the message shown to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Por favor, insira o nome de uma personalidade.")]
    EmptyInput,

    #[error("Já existe um avatar sendo criado. Aguarde a conclusão.")]
    Busy,

    #[error("Personalidade \"{search_term}\" não encontrada na Wikipedia. Tente outra.")]
    NotFound { search_term: String },

    #[error(
        "O termo \"{search_term}\" é ambíguo. Por favor, seja mais específico (ex: \"{search_term}, o Grande\" ou \"{search_term} (cientista)\")."
    )]
    Ambiguous { search_term: String },

    #[error("A página da Wikipedia para \"{search_term}\" não contém informações suficientes. Tente outra.")]
    InsufficientContent { search_term: String },

    #[error("Ocorreu um erro ao buscar informações na Wikipedia. Verifique sua conexão ou tente novamente mais tarde.")]
    LookupFailed,

    #[error("Ocorreu um erro inesperado ao criar o avatar. Tente novamente.")]
    Unexpected(String),
}

/// Split a lookup outcome into the page or the user-facing failure
pub fn page_or_error(outcome: LookupOutcome) -> Result<PageSummary, PipelineError> {
    match outcome {
        LookupOutcome::Success(page) => Ok(page),
        LookupOutcome::NotFound { search_term } => Err(PipelineError::NotFound { search_term }),
        LookupOutcome::Ambiguous { search_term } => Err(PipelineError::Ambiguous { search_term }),
        LookupOutcome::InsufficientContent { search_term } => Err(PipelineError::InsufficientContent { search_term }),
        LookupOutcome::ApiError { .. } => Err(PipelineError::LookupFailed),
    }
}

/// Called with every state the pipeline enters
pub type ProgressObserver = Box<dyn Fn(&PipelineState) + Send + Sync>;

/// Clears the in-flight flag when a run ends, however it ends
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct Pipeline {
    knowledge: Arc<dyn KnowledgeSource>,
    inference: Arc<dyn TraitInferrer>,
    registry: Arc<RwLock<AgentRegistry>>,
    rng: Mutex<StdRng>,
    state: Mutex<PipelineState>,
    in_flight: AtomicBool,
    observer: Option<ProgressObserver>,
}

impl Pipeline {
    pub fn new(
        knowledge: Arc<dyn KnowledgeSource>,
        inference: Arc<dyn TraitInferrer>,
        registry: Arc<RwLock<AgentRegistry>>,
    ) -> Self {
        Self {
            knowledge,
            inference,
            registry,
            rng: Mutex::new(StdRng::from_entropy()),
            state: Mutex::new(PipelineState::Idle),
            in_flight: AtomicBool::new(false),
            observer: None,
        }
    }

    /// Make voice, color and id choices reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn registry(&self) -> Arc<RwLock<AgentRegistry>> {
        Arc::clone(&self.registry)
    }

    pub fn state(&self) -> PipelineState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    #[allow(dead_code)] // for an interactive front end
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The user touched the input again: a failed run goes back to idle
    #[allow(dead_code)] // for an interactive front end
    pub fn input_edited(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(*state, PipelineState::Failed { .. }) {
            *state = PipelineState::Idle;
            drop(state);
            self.notify(&PipelineState::Idle);
        }
    }

    fn set_state(&self, next: PipelineState) {
        log::debug!("Pipeline state: {:?}", next);
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next.clone();
        self.notify(&next);
    }

    fn notify(&self, state: &PipelineState) {
        if let Some(ref observer) = self.observer {
            observer(state);
        }
    }

    /// Create an agent for `input`, register it and make it current
    pub async fn create(&self, input: &str) -> Result<Agent, PipelineError> {
        let search_term = input.trim();
        if search_term.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            log::warn!("Ignoring \"{}\": a run is already in flight", search_term);
            return Err(PipelineError::Busy);
        };

        log::info!("Creating agent for \"{}\"", search_term);
        let result = self.run(search_term).await;

        match &result {
            Ok(agent) => self.set_state(PipelineState::Done {
                agent_id: agent.id.clone(),
            }),
            Err(e) => {
                log::warn!("Agent creation for \"{}\" failed: {:?}", search_term, e);
                self.set_state(PipelineState::Failed { reason: e.to_string() });
            }
        }

        result
    }

    async fn run(&self, search_term: &str) -> Result<Agent, PipelineError> {
        self.set_state(PipelineState::LookingUp);
        let page = self.lookup(search_term).await?;

        self.set_state(PipelineState::InferringTrait);
        let category = self.infer(&page.extract).await;

        self.set_state(PipelineState::Synthesizing);
        let agent = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let voice = assign_voice(category, &mut *rng);
            synthesis::synthesize(&page, voice, &mut *rng)
        };

        self.registry
            .write()
            .map_err(|_| PipelineError::Unexpected("agent registry lock poisoned".to_string()))?
            .add_and_select(agent.clone())
            .map_err(|e| PipelineError::Unexpected(e.to_string()))?;

        log::info!(
            "Created agent {} \"{}\" (category: {}, voice: {}, color: {})",
            agent.id,
            agent.name,
            category,
            agent.voice,
            agent.body_color
        );
        Ok(agent)
    }

    async fn lookup(&self, search_term: &str) -> Result<PageSummary, PipelineError> {
        let knowledge = Arc::clone(&self.knowledge);
        let term = search_term.to_string();

        let outcome = tokio::task::spawn_blocking(move || knowledge.lookup(&term))
            .await
            .unwrap_or_else(|e| {
                log::error!("Lookup task failed: {}", e);
                LookupOutcome::ApiError {
                    search_term: Some(search_term.to_string()),
                }
            });

        page_or_error(outcome)
    }

    async fn infer(&self, extract: &str) -> InferredCategory {
        let inference = Arc::clone(&self.inference);
        let extract = extract.to_string();

        tokio::task::spawn_blocking(move || inference.infer_category(&extract))
            .await
            .unwrap_or_else(|e| {
                log::warn!("Inference task failed, using fallback: {}", e);
                InferredCategory::Uncertain
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{BodyColor, Voice};
    use crate::config::InferenceConfig;
    use crate::inference::GeminiClient;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    struct FakeKnowledge {
        outcome: LookupOutcome,
        calls: AtomicUsize,
        last_term: Mutex<Option<String>>,
    }

    impl FakeKnowledge {
        fn new(outcome: LookupOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                last_term: Mutex::new(None),
            })
        }
    }

    impl KnowledgeSource for FakeKnowledge {
        fn lookup(&self, search_term: &str) -> LookupOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_term.lock().unwrap() = Some(search_term.to_string());
            self.outcome.clone()
        }
    }

    struct FakeInferrer {
        category: InferredCategory,
        calls: AtomicUsize,
    }

    impl FakeInferrer {
        fn new(category: InferredCategory) -> Arc<Self> {
            Arc::new(Self {
                category,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl TraitInferrer for FakeInferrer {
        fn infer_category(&self, _excerpt: &str) -> InferredCategory {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.category
        }
    }

    /// Blocks inside lookup until released
    struct GatedKnowledge {
        entered: Mutex<Option<tokio::sync::oneshot::Sender<()>>>,
        release: Mutex<mpsc::Receiver<()>>,
        outcome: LookupOutcome,
    }

    impl KnowledgeSource for GatedKnowledge {
        fn lookup(&self, _search_term: &str) -> LookupOutcome {
            if let Some(tx) = self.entered.lock().unwrap().take() {
                let _ = tx.send(());
            }
            let _ = self.release.lock().unwrap().recv();
            self.outcome.clone()
        }
    }

    fn napoleon() -> LookupOutcome {
        LookupOutcome::Success(PageSummary {
            title: "Napoleão Bonaparte".to_string(),
            extract: "N".repeat(2000),
            image_url: Some("https://upload.example/napoleao.jpg".to_string()),
        })
    }

    fn registry() -> Arc<RwLock<AgentRegistry>> {
        Arc::new(RwLock::new(AgentRegistry::default()))
    }

    fn pipeline(knowledge: Arc<dyn KnowledgeSource>, inference: Arc<dyn TraitInferrer>) -> Pipeline {
        Pipeline::new(knowledge, inference, registry()).with_seed(1234)
    }

    #[tokio::test]
    async fn test_success_registers_and_selects_agent() {
        let knowledge = FakeKnowledge::new(napoleon());
        let pipeline = pipeline(knowledge.clone(), FakeInferrer::new(InferredCategory::Male));

        let agent = pipeline.create("Napoleão Bonaparte").await.unwrap();

        assert_eq!(agent.name, "Napoleão Bonaparte");
        assert_eq!(agent.image_url.as_deref(), Some("https://upload.example/napoleao.jpg"));
        assert!(agent.personality.contains(&"N".repeat(2000)));
        assert!(Voice::MALE.contains(&agent.voice));
        assert!(BodyColor::PALETTE.contains(&agent.body_color));

        let registry = pipeline.registry();
        let registry = registry.read().unwrap();
        assert_eq!(registry.personal().len(), 1);
        assert_eq!(registry.current().id, agent.id);
        assert_eq!(pipeline.state(), PipelineState::Done { agent_id: agent.id.clone() });
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_female_category_picks_female_voice() {
        let pipeline = pipeline(FakeKnowledge::new(napoleon()), FakeInferrer::new(InferredCategory::Female));
        let agent = pipeline.create("Marie Curie").await.unwrap();
        assert!(Voice::FEMALE.contains(&agent.voice));
    }

    #[tokio::test]
    async fn test_input_is_trimmed_before_lookup() {
        let knowledge = FakeKnowledge::new(napoleon());
        let pipeline = pipeline(knowledge.clone(), FakeInferrer::new(InferredCategory::Male));

        pipeline.create("   Napoleão Bonaparte \n").await.unwrap();

        assert_eq!(knowledge.last_term.lock().unwrap().as_deref(), Some("Napoleão Bonaparte"));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_call() {
        let knowledge = FakeKnowledge::new(napoleon());
        let pipeline = pipeline(knowledge.clone(), FakeInferrer::new(InferredCategory::Male));

        assert_eq!(pipeline.create("   ").await, Err(PipelineError::EmptyInput));
        assert_eq!(pipeline.create("").await, Err(PipelineError::EmptyInput));

        assert_eq!(knowledge.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn test_not_found_registers_nothing() {
        let inferrer = FakeInferrer::new(InferredCategory::Male);
        let pipeline = pipeline(
            FakeKnowledge::new(LookupOutcome::NotFound {
                search_term: "Zzqx123NoSuchPage".to_string(),
            }),
            inferrer.clone(),
        );

        let err = pipeline.create("Zzqx123NoSuchPage").await.unwrap_err();

        assert!(matches!(err, PipelineError::NotFound { .. }));
        assert!(err.to_string().contains("\"Zzqx123NoSuchPage\""));
        assert_eq!(inferrer.calls.load(Ordering::SeqCst), 0);
        assert!(pipeline.registry().read().unwrap().personal().is_empty());
        assert_eq!(pipeline.state(), PipelineState::Failed { reason: err.to_string() });
    }

    #[tokio::test]
    async fn test_ambiguous_suggests_refinement() {
        let pipeline = pipeline(
            FakeKnowledge::new(LookupOutcome::Ambiguous {
                search_term: "Mercúrio".to_string(),
            }),
            FakeInferrer::new(InferredCategory::Male),
        );

        let err = pipeline.create("Mercúrio").await.unwrap_err();

        assert!(matches!(err, PipelineError::Ambiguous { .. }));
        let message = err.to_string();
        assert!(message.contains("seja mais específico"));
        assert!(message.contains("\"Mercúrio (cientista)\""));
    }

    #[tokio::test]
    async fn test_insufficient_content() {
        let pipeline = pipeline(
            FakeKnowledge::new(LookupOutcome::InsufficientContent {
                search_term: "Stub".to_string(),
            }),
            FakeInferrer::new(InferredCategory::Male),
        );
        let err = pipeline.create("Stub").await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::InsufficientContent {
                search_term: "Stub".to_string()
            }
        );
        assert!(pipeline.registry().read().unwrap().personal().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_is_generic() {
        let pipeline = pipeline(
            FakeKnowledge::new(LookupOutcome::ApiError { search_term: None }),
            FakeInferrer::new(InferredCategory::Male),
        );
        let err = pipeline.create("Qualquer").await.unwrap_err();
        assert_eq!(err, PipelineError::LookupFailed);
        assert!(err.to_string().contains("Verifique sua conexão"));
    }

    #[tokio::test]
    async fn test_inference_network_error_still_completes() {
        let gemini = GeminiClient::new(
            InferenceConfig {
                base_url: "http://127.0.0.1:9/v1beta".to_string(),
                timeout_secs: 2,
                ..Default::default()
            },
            Some("test-key".to_string()),
        );
        let pipeline = pipeline(FakeKnowledge::new(napoleon()), Arc::new(gemini));

        let agent = pipeline.create("Napoleão Bonaparte").await.unwrap();

        assert!(Voice::UNCERTAIN.contains(&agent.voice));
        assert!(matches!(pipeline.state(), PipelineState::Done { .. }));
    }

    #[tokio::test]
    async fn test_input_edit_clears_failure() {
        let pipeline = pipeline(
            FakeKnowledge::new(LookupOutcome::ApiError { search_term: None }),
            FakeInferrer::new(InferredCategory::Male),
        );
        let _ = pipeline.create("X").await;
        assert!(matches!(pipeline.state(), PipelineState::Failed { .. }));

        pipeline.input_edited();
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn test_input_edit_keeps_done() {
        let pipeline = pipeline(FakeKnowledge::new(napoleon()), FakeInferrer::new(InferredCategory::Male));
        pipeline.create("Napoleão Bonaparte").await.unwrap();
        pipeline.input_edited();
        assert!(matches!(pipeline.state(), PipelineState::Done { .. }));
    }

    #[tokio::test]
    async fn test_observer_sees_every_transition() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let pipeline = pipeline(FakeKnowledge::new(napoleon()), FakeInferrer::new(InferredCategory::Male))
            .with_observer(Box::new(move |state| sink.lock().unwrap().push(state.clone())));

        let agent = pipeline.create("Napoleão Bonaparte").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                PipelineState::LookingUp,
                PipelineState::InferringTrait,
                PipelineState::Synthesizing,
                PipelineState::Done { agent_id: agent.id },
            ]
        );
    }

    #[tokio::test]
    async fn test_same_seed_same_agent() {
        let a = pipeline(FakeKnowledge::new(napoleon()), FakeInferrer::new(InferredCategory::Female))
            .create("Napoleão Bonaparte")
            .await
            .unwrap();
        let b = pipeline(FakeKnowledge::new(napoleon()), FakeInferrer::new(InferredCategory::Female))
            .create("Napoleão Bonaparte")
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_consecutive_runs_get_distinct_ids() {
        let pipeline = pipeline(FakeKnowledge::new(napoleon()), FakeInferrer::new(InferredCategory::Male));
        let a = pipeline.create("Napoleão Bonaparte").await.unwrap();
        let b = pipeline.create("Napoleão Bonaparte").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(pipeline.registry().read().unwrap().personal().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_submission_while_busy_is_ignored() {
        let (entered_tx, entered_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let knowledge = Arc::new(GatedKnowledge {
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(release_rx),
            outcome: napoleon(),
        });
        let pipeline = Arc::new(pipeline(knowledge, FakeInferrer::new(InferredCategory::Male)));

        let first = {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.create("Napoleão Bonaparte").await })
        };
        entered_rx.await.unwrap();

        assert!(pipeline.is_busy());
        assert_eq!(pipeline.create("Napoleão Bonaparte").await, Err(PipelineError::Busy));
        assert_eq!(pipeline.state(), PipelineState::LookingUp);

        release_tx.send(()).unwrap();
        let agent = first.await.unwrap().unwrap();

        let registry = pipeline.registry();
        let registry = registry.read().unwrap();
        assert_eq!(registry.personal().len(), 1);
        assert_eq!(registry.current().id, agent.id);
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_registration_conflict_is_unexpected_and_clean() {
        let registry = registry();
        let knowledge = FakeKnowledge::new(napoleon());

        // Same seed twice against one registry reproduces the same id
        let first = Pipeline::new(knowledge.clone(), FakeInferrer::new(InferredCategory::Male), registry.clone())
            .with_seed(5);
        let agent = first.create("Napoleão Bonaparte").await.unwrap();

        let second =
            Pipeline::new(knowledge, FakeInferrer::new(InferredCategory::Male), registry.clone()).with_seed(5);
        let err = second.create("Napoleão Bonaparte").await.unwrap_err();

        assert!(matches!(err, PipelineError::Unexpected(_)));
        assert!(err.to_string().contains("erro inesperado"));
        let registry = registry.read().unwrap();
        assert_eq!(registry.personal().len(), 1);
        assert_eq!(registry.current().id, agent.id);
    }

    #[test]
    fn test_progress_messages() {
        assert!(PipelineState::LookingUp.progress_message().unwrap().contains("Wikipedia"));
        assert!(PipelineState::InferringTrait.progress_message().is_some());
        assert!(PipelineState::Idle.progress_message().is_none());
    }
}
