// src/services/allocation_service.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{JobsRepository, ProfilesRepository},
    models::jobs::JobAssignment,
    models::profiles::Engineer,
};

// Sentinela de "sem engenheiro": é valor de exibição E chave de
// agrupamento da coluna de não alocados. Um engenheiro real chamado
// "Unassigned" colidiria com ela; a ambiguidade é conhecida e fica
// documentada em DESIGN.md, não corrigida aqui.
pub const UNASSIGNED: &str = "Unassigned";

// Seam injetado: em produção é o par de repositórios Postgres; nos testes,
// um dublê em memória.
#[async_trait]
pub trait AllocationStore: Send + Sync {
    async fn list_assignments(&self) -> Result<Vec<JobAssignment>, AppError>;
    async fn list_engineers(&self) -> Result<Vec<Engineer>, AppError>;
    async fn update_job_engineer(
        &self,
        job_id: Uuid,
        engineer_id: Option<Uuid>,
    ) -> Result<(), AppError>;
}

pub struct PgAllocationStore {
    jobs: JobsRepository,
    profiles: ProfilesRepository,
}

impl PgAllocationStore {
    pub fn new(jobs: JobsRepository, profiles: ProfilesRepository) -> Self {
        Self { jobs, profiles }
    }
}

#[async_trait]
impl AllocationStore for PgAllocationStore {
    async fn list_assignments(&self) -> Result<Vec<JobAssignment>, AppError> {
        self.jobs.list_assignments().await
    }

    async fn list_engineers(&self) -> Result<Vec<Engineer>, AppError> {
        let rows = self.profiles.list_engineers().await?;
        Ok(rows.into_iter().map(Engineer::from_row).collect())
    }

    async fn update_job_engineer(
        &self,
        job_id: Uuid,
        engineer_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        self.jobs.update_engineer(job_id, engineer_id).await
    }
}

// --- Estado do quadro ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AllocationPhase {
    Idle,
    Pending,
    Reverting,
}

#[derive(Debug, Clone)]
struct JobSlot {
    engineer_name: String,
    phase: AllocationPhase,
}

#[derive(Default)]
struct BoardState {
    slots: HashMap<Uuid, JobSlot>,
    loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    Persisted,
    // Ids 'mock-*' são fixtures de demo: o estado otimista fica, o banco
    // não é tocado.
    DemoSkipped,
}

// --- View models do quadro ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    pub job_id: Uuid,
    pub engineer_name: String,
    pub phase: AllocationPhase,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineerColumn {
    pub engineer: Engineer,
    pub jobs: Vec<AllocationEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBoard {
    pub unallocated: Vec<AllocationEntry>,
    pub engineers: Vec<EngineerColumn>,
}

// Gerenciador de atribuição otimista. O mutex protege só o HashMap local
// e nunca atravessa um await; as chamadas ao store acontecem com o lock
// solto. Uma atribuição em voo por job; jobs diferentes são independentes.
pub struct AllocationService {
    store: Arc<dyn AllocationStore>,
    board: Mutex<BoardState>,
}

impl AllocationService {
    pub fn new(store: Arc<dyn AllocationStore>) -> Self {
        Self {
            store,
            board: Mutex::new(BoardState::default()),
        }
    }

    // Refetch completo: substitui os nomes locais pelos do store (nada de
    // patch parcial). As fases em andamento de outros jobs são preservadas.
    pub async fn resync(&self) -> Result<(), AppError> {
        let rows = self.store.list_assignments().await?;

        let mut board = self.board.lock().unwrap();
        let phases: HashMap<Uuid, AllocationPhase> = board
            .slots
            .iter()
            .map(|(id, slot)| (*id, slot.phase))
            .collect();

        board.slots.clear();
        for row in rows {
            board.slots.insert(
                row.id,
                JobSlot {
                    engineer_name: row
                        .engineer_name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| UNASSIGNED.to_string()),
                    phase: phases.get(&row.id).copied().unwrap_or(AllocationPhase::Idle),
                },
            );
        }
        board.loaded = true;

        Ok(())
    }

    async fn ensure_loaded(&self) -> Result<(), AppError> {
        let loaded = self.board.lock().unwrap().loaded;
        if !loaded {
            self.resync().await?;
        }
        Ok(())
    }

    // Quadro agrupado: coluna de não alocados + uma coluna por engenheiro.
    // O agrupamento casa pelo nome exibível (mesma chave da sentinela).
    pub async fn board(&self) -> Result<AllocationBoard, AppError> {
        self.ensure_loaded().await?;
        let engineers = self.store.list_engineers().await?;

        let board = self.board.lock().unwrap();
        let entry_of = |(id, slot): (&Uuid, &JobSlot)| AllocationEntry {
            job_id: *id,
            engineer_name: slot.engineer_name.clone(),
            phase: slot.phase,
        };

        let unallocated = board
            .slots
            .iter()
            .filter(|(_, slot)| slot.engineer_name == UNASSIGNED)
            .map(entry_of)
            .collect();

        let engineers = engineers
            .into_iter()
            .map(|engineer| {
                let jobs = board
                    .slots
                    .iter()
                    .filter(|(_, slot)| slot.engineer_name == engineer.full_name)
                    .map(entry_of)
                    .collect();
                EngineerColumn { engineer, jobs }
            })
            .collect();

        Ok(AllocationBoard {
            unallocated,
            engineers,
        })
    }

    // assign(jobId, engineerRef|null), nos passos estritos:
    //   1. rejeita se já existe atribuição em voo para o job;
    //   2. aplica o nome novo localmente ANTES de qualquer persistência;
    //   3. id 'mock-*' pula a persistência e mantém o otimista (demo);
    //   4. persiste; em falha reverte o snapshot e ressincroniza do store.
    pub async fn assign(
        &self,
        job_id: Uuid,
        engineer_id: Option<String>,
    ) -> Result<AssignOutcome, AppError> {
        self.ensure_loaded().await?;

        let engineers = self.store.list_engineers().await?;
        let new_name = engineer_id
            .as_deref()
            .and_then(|id| engineers.iter().find(|e| e.id == id))
            .map(|e| e.full_name.clone())
            .unwrap_or_else(|| UNASSIGNED.to_string());

        // Passos 1 e 2 sob o lock, sem await.
        let previous = {
            let mut board = self.board.lock().unwrap();
            let slot = board.slots.entry(job_id).or_insert_with(|| JobSlot {
                engineer_name: UNASSIGNED.to_string(),
                phase: AllocationPhase::Idle,
            });

            if slot.phase == AllocationPhase::Pending {
                return Err(AppError::AssignmentInFlight);
            }

            let previous = slot.engineer_name.clone();
            slot.engineer_name = new_name;
            slot.phase = AllocationPhase::Pending;
            previous
        };

        // Passo 3: curto-circuito de demo.
        if let Some(id) = engineer_id.as_deref() {
            if id.starts_with("mock-") {
                tracing::info!("Modo demo: atribuição de {} não persiste.", id);
                self.set_phase(job_id, AllocationPhase::Idle);
                return Ok(AssignOutcome::DemoSkipped);
            }
        }

        // Passo 4: persiste. Referência que não parseia segue o mesmo
        // caminho de reversão de uma falha do store.
        let parsed = match engineer_id.as_deref().map(Uuid::parse_str).transpose() {
            Ok(parsed) => parsed,
            Err(_) => {
                self.revert(job_id, previous).await;
                return Err(AppError::InvalidEngineerRef(
                    engineer_id.unwrap_or_default(),
                ));
            }
        };

        match self.store.update_job_engineer(job_id, parsed).await {
            Ok(()) => {
                // O estado otimista já reflete o store; só libera o job.
                self.set_phase(job_id, AllocationPhase::Idle);
                Ok(AssignOutcome::Persisted)
            }
            Err(e) => {
                self.revert(job_id, previous).await;
                Err(e)
            }
        }
    }

    fn set_phase(&self, job_id: Uuid, phase: AllocationPhase) {
        let mut board = self.board.lock().unwrap();
        if let Some(slot) = board.slots.get_mut(&job_id) {
            slot.phase = phase;
        }
    }

    // Reversão: restaura o snapshot e depois refaz o quadro inteiro a
    // partir do store em vez de confiar no patch local.
    async fn revert(&self, job_id: Uuid, previous: String) {
        {
            let mut board = self.board.lock().unwrap();
            if let Some(slot) = board.slots.get_mut(&job_id) {
                slot.engineer_name = previous;
                slot.phase = AllocationPhase::Reverting;
            }
        }

        if let Err(e) = self.resync().await {
            tracing::warn!("Falha ao ressincronizar o quadro de alocação: {}", e);
        }

        self.set_phase(job_id, AllocationPhase::Idle);
    }

    #[cfg(test)]
    fn engineer_name_of(&self, job_id: Uuid) -> Option<String> {
        self.board
            .lock()
            .unwrap()
            .slots
            .get(&job_id)
            .map(|s| s.engineer_name.clone())
    }

    #[cfg(test)]
    fn force_pending(&self, job_id: Uuid) {
        let mut board = self.board.lock().unwrap();
        board.slots.insert(
            job_id,
            JobSlot {
                engineer_name: UNASSIGNED.to_string(),
                phase: AllocationPhase::Pending,
            },
        );
        board.loaded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubStore {
        assignments: Mutex<Vec<JobAssignment>>,
        engineers: Vec<Engineer>,
        fail_update: AtomicBool,
        updates: Mutex<Vec<(Uuid, Option<Uuid>)>>,
    }

    impl StubStore {
        fn new(assignments: Vec<JobAssignment>, engineers: Vec<Engineer>) -> Self {
            Self {
                assignments: Mutex::new(assignments),
                engineers,
                fail_update: AtomicBool::new(false),
                updates: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AllocationStore for StubStore {
        async fn list_assignments(&self) -> Result<Vec<JobAssignment>, AppError> {
            Ok(self.assignments.lock().unwrap().clone())
        }

        async fn list_engineers(&self) -> Result<Vec<Engineer>, AppError> {
            Ok(self.engineers.clone())
        }

        async fn update_job_engineer(
            &self,
            job_id: Uuid,
            engineer_id: Option<Uuid>,
        ) -> Result<(), AppError> {
            if self.fail_update.load(Ordering::SeqCst) {
                return Err(AppError::StorageError("permission denied".into()));
            }
            self.updates.lock().unwrap().push((job_id, engineer_id));
            Ok(())
        }
    }

    fn engineer(id: &str, name: &str) -> Engineer {
        Engineer {
            id: id.to_string(),
            email: String::new(),
            full_name: name.to_string(),
            role: "engineer".to_string(),
            initials: name.chars().take(2).collect::<String>().to_uppercase(),
        }
    }

    fn service_with(
        assignments: Vec<JobAssignment>,
        engineers: Vec<Engineer>,
    ) -> (AllocationService, Arc<StubStore>) {
        let store = Arc::new(StubStore::new(assignments, engineers));
        (AllocationService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn engenheiro_demo_nao_chega_ao_store() {
        let job_id = Uuid::new_v4();
        let (service, store) = service_with(
            vec![JobAssignment {
                id: job_id,
                engineer_name: None,
            }],
            vec![engineer("mock-2", "Mike Ryan")],
        );

        let outcome = service.assign(job_id, Some("mock-2".into())).await.unwrap();

        assert_eq!(outcome, AssignOutcome::DemoSkipped);
        // Estado otimista fica; nenhuma chamada de persistência sai.
        assert_eq!(service.engineer_name_of(job_id).as_deref(), Some("Mike Ryan"));
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn atribuicao_real_persiste_e_mantem_o_otimista() {
        let job_id = Uuid::new_v4();
        let engineer_id = Uuid::new_v4();
        let (service, store) = service_with(
            vec![JobAssignment {
                id: job_id,
                engineer_name: None,
            }],
            vec![engineer(&engineer_id.to_string(), "John Condon")],
        );

        let outcome = service
            .assign(job_id, Some(engineer_id.to_string()))
            .await
            .unwrap();

        assert_eq!(outcome, AssignOutcome::Persisted);
        assert_eq!(
            service.engineer_name_of(job_id).as_deref(),
            Some("John Condon")
        );
        assert_eq!(
            *store.updates.lock().unwrap(),
            vec![(job_id, Some(engineer_id))]
        );
    }

    #[tokio::test]
    async fn falha_de_persistencia_reverte_via_refetch() {
        let job_id = Uuid::new_v4();
        let engineer_id = Uuid::new_v4();
        let (service, store) = service_with(
            vec![JobAssignment {
                id: job_id,
                engineer_name: Some("John Condon".into()),
            }],
            vec![engineer(&engineer_id.to_string(), "Mike Ryan")],
        );
        store.fail_update.store(true, Ordering::SeqCst);

        let result = service.assign(job_id, Some(engineer_id.to_string())).await;

        assert!(result.is_err());
        // Pós-falha o estado local é o do store, não o otimista.
        assert_eq!(
            service.engineer_name_of(job_id).as_deref(),
            Some("John Condon")
        );
    }

    #[tokio::test]
    async fn desatribuir_persiste_null_e_usa_a_sentinela() {
        let job_id = Uuid::new_v4();
        let (service, store) = service_with(
            vec![JobAssignment {
                id: job_id,
                engineer_name: Some("John Condon".into()),
            }],
            vec![],
        );

        let outcome = service.assign(job_id, None).await.unwrap();

        assert_eq!(outcome, AssignOutcome::Persisted);
        assert_eq!(service.engineer_name_of(job_id).as_deref(), Some(UNASSIGNED));
        assert_eq!(*store.updates.lock().unwrap(), vec![(job_id, None)]);
    }

    #[tokio::test]
    async fn segunda_atribuicao_em_voo_e_rejeitada() {
        let job_id = Uuid::new_v4();
        let (service, _store) = service_with(vec![], vec![]);
        service.force_pending(job_id);

        let result = service.assign(job_id, None).await;
        assert!(matches!(result, Err(AppError::AssignmentInFlight)));
    }

    #[tokio::test]
    async fn referencia_invalida_reverte_como_falha() {
        let job_id = Uuid::new_v4();
        let (service, store) = service_with(
            vec![JobAssignment {
                id: job_id,
                engineer_name: None,
            }],
            vec![],
        );

        let result = service.assign(job_id, Some("not-a-uuid".into())).await;

        assert!(matches!(result, Err(AppError::InvalidEngineerRef(_))));
        assert_eq!(service.engineer_name_of(job_id).as_deref(), Some(UNASSIGNED));
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn quadro_agrupa_pela_sentinela_e_pelo_nome() {
        let j1 = Uuid::new_v4();
        let j2 = Uuid::new_v4();
        let (service, _store) = service_with(
            vec![
                JobAssignment {
                    id: j1,
                    engineer_name: None,
                },
                JobAssignment {
                    id: j2,
                    engineer_name: Some("Mike Ryan".into()),
                },
            ],
            vec![engineer("mock-1", "Mike Ryan")],
        );

        let board = service.board().await.unwrap();

        assert_eq!(board.unallocated.len(), 1);
        assert_eq!(board.unallocated[0].job_id, j1);
        assert_eq!(board.engineers.len(), 1);
        assert_eq!(board.engineers[0].jobs.len(), 1);
        assert_eq!(board.engineers[0].jobs[0].job_id, j2);
    }
}
