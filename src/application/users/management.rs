//! Users-management page controller
//!
//! Owns the canonical record list, the filters and the selection for one page
//! mount. Every mutation runs under a single-flight guard and follows the same
//! sequence: confirm, gateway call, atomic apply, recompute, notify.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{error, info, warn};

use super::export::users_to_xlsx;
use crate::application::ports::{Dialogs, UserGateway};
use crate::config::UsersConfig;
use crate::domain::{
    DateWindow, FilterState, HeaderCheckbox, SelectionSet, UserDetails, UserRecord, UserStatus,
    UserType,
};
use crate::infrastructure::Downloads;
use crate::notifications::NotificationCenter;
use crate::shared::PaginatedResult;
use crate::support::errors::{AppResult, DomainError};
use crate::support::InFlight;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Default)]
struct TableState {
    users: Vec<UserRecord>,
    filter: FilterState,
    selection: SelectionSet,
    visible: Vec<u32>,
    page: u32,
}

impl TableState {
    fn recompute(&mut self, today: NaiveDate) {
        self.visible = self.filter.apply(&self.users, today);
    }

    fn find(&self, id: u32) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }
}

enum Mutation {
    SetStatus(Vec<u32>, UserStatus),
    Delete(Vec<u32>),
    ResetPassword(u32),
}

struct Confirmation {
    title: &'static str,
    text: String,
}

pub struct UsersManagement {
    gateway: Arc<dyn UserGateway>,
    dialogs: Arc<dyn Dialogs>,
    notifications: NotificationCenter,
    config: UsersConfig,
    state: Mutex<TableState>,
    mutation: InFlight,
    search_generation: AtomicU64,
    clock: Clock,
}

impl UsersManagement {
    pub fn new(
        gateway: Arc<dyn UserGateway>,
        dialogs: Arc<dyn Dialogs>,
        notifications: NotificationCenter,
        config: UsersConfig,
    ) -> Self {
        Self {
            gateway,
            dialogs,
            notifications,
            config,
            state: Mutex::new(TableState {
                page: 1,
                ..TableState::default()
            }),
            mutation: InFlight::new("user mutation"),
            search_generation: AtomicU64::new(0),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Operator's calendar day, used by the date windows
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }

    fn state(&self) -> MutexGuard<'_, TableState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ── Loading ────────────────────────────────────────────────

    /// Load the records for this mount
    pub async fn mount(&self) -> AppResult<usize> {
        match self.gateway.load_users().await {
            Ok(users) => {
                let count = users.len();
                self.replace_users(users);
                info!(count, "Users loaded");
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "Failed to load users");
                self.notifications.error("Error cargando datos de usuarios");
                Err(e.into())
            }
        }
    }

    /// Replace the canonical list; selection entries for vanished ids are dropped.
    pub fn replace_users(&self, users: Vec<UserRecord>) {
        let today = self.today();
        let mut guard = self.state();
        let state = &mut *guard;
        state.users = users;
        let existing: HashSet<u32> = state.users.iter().map(|u| u.id).collect();
        state.selection.retain_existing(|id| existing.contains(&id));
        state.page = 1;
        state.recompute(today);
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn users(&self) -> Vec<UserRecord> {
        self.state().users.clone()
    }

    pub fn user(&self, id: u32) -> Option<UserRecord> {
        self.state().find(id).cloned()
    }

    pub fn total(&self) -> usize {
        self.state().users.len()
    }

    pub fn visible_ids(&self) -> Vec<u32> {
        self.state().visible.clone()
    }

    pub fn visible_users(&self) -> Vec<UserRecord> {
        let state = self.state();
        state
            .visible
            .iter()
            .filter_map(|id| state.find(*id).cloned())
            .collect()
    }

    pub fn filter(&self) -> FilterState {
        self.state().filter.clone()
    }

    pub fn selection(&self) -> SelectionSet {
        self.state().selection.clone()
    }

    /// Value of the bulk-actions card counter
    pub fn selected_count(&self) -> usize {
        self.state().selection.len()
    }

    /// Selected ids hidden by the current filters
    pub fn hidden_selected(&self) -> Vec<u32> {
        let state = self.state();
        state.selection.hidden(&state.visible)
    }

    pub fn header_state(&self) -> HeaderCheckbox {
        let state = self.state();
        state.selection.header_state(&state.visible)
    }

    pub fn is_busy(&self) -> bool {
        self.mutation.is_busy()
    }

    // ── Filters ────────────────────────────────────────────────

    pub fn set_filters(&self, filter: FilterState) {
        let today = self.today();
        let mut state = self.state();
        state.filter = filter;
        state.page = 1;
        state.recompute(today);
    }

    fn update_filter(&self, update: impl FnOnce(&mut FilterState)) {
        let mut filter = self.filter();
        update(&mut filter);
        self.set_filters(filter);
    }

    pub fn set_search(&self, search: &str) {
        self.update_filter(|f| f.set_search(search));
    }

    pub fn set_type_filter(&self, user_type: Option<UserType>) {
        self.update_filter(|f| f.user_type = user_type);
    }

    pub fn set_status_filter(&self, status: Option<UserStatus>) {
        self.update_filter(|f| f.status = status);
    }

    pub fn set_date_filter(&self, date: Option<DateWindow>) {
        self.update_filter(|f| f.date = date);
    }

    pub fn clear_filters(&self) {
        self.set_filters(FilterState::default());
    }

    /// Keystroke in the search box. Applied only if no newer keystroke arrives
    /// within the debounce window; returns whether this one was applied.
    pub async fn search_input(&self, text: &str) -> bool {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(Duration::from_millis(self.config.search_debounce_ms)).await;
        if self.search_generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        self.set_search(text);
        true
    }

    // ── Pagination ─────────────────────────────────────────────

    pub fn current_page(&self) -> PaginatedResult<UserRecord> {
        let page = self.state().page;
        PaginatedResult::paginate(&self.visible_users(), page, self.config.page_size)
    }

    pub fn go_to_page(&self, page: u32) -> PaginatedResult<UserRecord> {
        self.state().page = page.max(1);
        let result = self.current_page();
        self.state().page = result.page;
        result
    }

    pub fn pagination_label(&self) -> String {
        self.current_page().range_label("usuarios")
    }

    // ── Selection ──────────────────────────────────────────────

    /// Ids that are not loaded are ignored.
    pub fn toggle_user(&self, id: u32, selected: bool) {
        let mut state = self.state();
        if selected && state.find(id).is_none() {
            warn!(id, "Ignoring selection of unknown user");
            return;
        }
        state.selection.toggle(id, selected);
    }

    /// Header checkbox: affects only the rows that pass the filters
    pub fn toggle_select_all(&self, selected: bool) {
        let mut guard = self.state();
        let state = &mut *guard;
        state.selection.toggle_all(&state.visible, selected);
    }

    pub fn clear_selection(&self) {
        self.state().selection.clear();
    }

    // ── Individual actions ─────────────────────────────────────

    pub fn view_details(&self, id: u32) -> AppResult<UserDetails> {
        let now = self.now();
        self.state()
            .find(id)
            .map(|u| u.details(now))
            .ok_or_else(|| DomainError::user_not_found(id).into())
    }

    pub fn edit_user(&self, id: u32) -> AppResult<()> {
        self.ensure_exists(id)?;
        self.notifications.info("Función de edición en desarrollo");
        Ok(())
    }

    pub async fn reset_password(&self, id: u32) -> AppResult<()> {
        self.ensure_exists(id)?;
        self.mutate(
            Some(Confirmation {
                title: "Resetear Contraseña",
                text: "¿Estás seguro de que deseas resetear la contraseña de este usuario?".into(),
            }),
            Mutation::ResetPassword(id),
            false,
            "Contraseña reseteada exitosamente".into(),
            "Error al resetear contraseña",
        )
        .await
    }

    pub async fn suspend_user(&self, id: u32) -> AppResult<()> {
        self.ensure_exists(id)?;
        self.mutate(
            Some(Confirmation {
                title: "Suspender Usuario",
                text: "¿Estás seguro de que deseas suspender este usuario?".into(),
            }),
            Mutation::SetStatus(vec![id], UserStatus::Suspendido),
            false,
            "Usuario suspendido exitosamente".into(),
            "Error al suspender usuario",
        )
        .await
    }

    pub async fn activate_user(&self, id: u32) -> AppResult<()> {
        self.ensure_exists(id)?;
        self.mutate(
            None,
            Mutation::SetStatus(vec![id], UserStatus::Activo),
            false,
            "Usuario activado exitosamente".into(),
            "Error al activar usuario",
        )
        .await
    }

    pub async fn delete_user(&self, id: u32) -> AppResult<()> {
        self.ensure_exists(id)?;
        self.mutate(
            Some(Confirmation {
                title: "Eliminar Usuario",
                text: "¿Estás seguro de que deseas eliminar este usuario? Esta acción no se puede deshacer.".into(),
            }),
            Mutation::Delete(vec![id]),
            false,
            "Usuario eliminado exitosamente".into(),
            "Error al eliminar usuario",
        )
        .await
    }

    fn ensure_exists(&self, id: u32) -> AppResult<()> {
        if self.state().find(id).is_none() {
            return Err(DomainError::user_not_found(id).into());
        }
        Ok(())
    }

    // ── Bulk actions ───────────────────────────────────────────

    pub async fn bulk_activate(&self) -> AppResult<()> {
        let (ids, hidden) = self.selected_for_bulk()?;
        let n = ids.len();
        self.mutate(
            Some(Confirmation {
                title: "Activar Usuarios",
                text: bulk_question("activar", n, hidden, false),
            }),
            Mutation::SetStatus(ids, UserStatus::Activo),
            true,
            format!("{} usuarios activados exitosamente", n),
            "Error en activación masiva",
        )
        .await
    }

    pub async fn bulk_suspend(&self) -> AppResult<()> {
        let (ids, hidden) = self.selected_for_bulk()?;
        let n = ids.len();
        self.mutate(
            Some(Confirmation {
                title: "Suspender Usuarios",
                text: bulk_question("suspender", n, hidden, false),
            }),
            Mutation::SetStatus(ids, UserStatus::Suspendido),
            true,
            format!("{} usuarios suspendidos exitosamente", n),
            "Error en suspensión masiva",
        )
        .await
    }

    pub async fn bulk_delete(&self) -> AppResult<()> {
        let (ids, hidden) = self.selected_for_bulk()?;
        let n = ids.len();
        self.mutate(
            Some(Confirmation {
                title: "Eliminar Usuarios",
                text: bulk_question("eliminar", n, hidden, true),
            }),
            Mutation::Delete(ids),
            true,
            format!("{} usuarios eliminados exitosamente", n),
            "Error en eliminación masiva",
        )
        .await
    }

    /// Write the selected records to `usuarios_export_YYYY-MM-DD.xlsx`.
    ///
    /// Read-only: the selection is kept.
    pub fn bulk_export(&self, downloads: &Downloads) -> AppResult<PathBuf> {
        let (ids, _) = self.selected_for_bulk()?;
        let records: Vec<UserRecord> = {
            let state = self.state();
            ids.iter().filter_map(|id| state.find(*id).cloned()).collect()
        };
        self.notifications
            .info(format!("Exportando {} usuarios...", records.len()));
        self.export_records(&records, downloads)
    }

    /// Write every loaded record, ignoring filters and selection
    pub fn export_all(&self, downloads: &Downloads) -> AppResult<PathBuf> {
        self.notifications.info("Exportando datos de usuarios...");
        let records = self.users();
        self.export_records(&records, downloads)
    }

    fn export_records(&self, records: &[UserRecord], downloads: &Downloads) -> AppResult<PathBuf> {
        let now = self.now();
        let today = self.today();
        let result = users_to_xlsx(records, now)
            .and_then(|bytes| downloads.save("usuarios_export", "xlsx", today, &bytes));
        match result {
            Ok(path) => {
                self.notifications
                    .success(format!("{} usuarios exportados", records.len()));
                Ok(path)
            }
            Err(e) => {
                error!(error = %e, "User export failed");
                self.notifications.error("Error al exportar usuarios");
                Err(e.into())
            }
        }
    }

    /// Selected ids plus how many of them the filters hide
    fn selected_for_bulk(&self) -> AppResult<(Vec<u32>, usize)> {
        let state = self.state();
        let ids: Vec<u32> = state
            .selection
            .ids()
            .into_iter()
            .filter(|id| state.find(*id).is_some())
            .collect();
        if ids.is_empty() {
            return Err(DomainError::EmptySelection.into());
        }
        let hidden = ids.iter().filter(|id| !state.visible.contains(id)).count();
        Ok((ids, hidden))
    }

    async fn mutate(
        &self,
        confirmation: Option<Confirmation>,
        mutation: Mutation,
        clear_selection: bool,
        success: String,
        failure: &'static str,
    ) -> AppResult<()> {
        let Some(_token) = self.mutation.try_begin() else {
            self.notifications
                .warning("Ya hay una operación en curso, espere a que termine");
            return Err(DomainError::InProgress(self.mutation.label()).into());
        };

        if let Some(c) = confirmation {
            if !self.dialogs.confirm(c.title, &c.text).await {
                return Err(DomainError::Cancelled.into());
            }
        }

        let outcome = match &mutation {
            Mutation::SetStatus(ids, status) => self.gateway.set_status(ids, *status).await,
            Mutation::Delete(ids) => self.gateway.delete_users(ids).await,
            Mutation::ResetPassword(id) => self.gateway.reset_password(*id).await,
        };
        if let Err(e) = outcome {
            warn!(error = %e, kind = %e.kind, "User mutation rejected");
            self.notifications.error(failure);
            return Err(e.into());
        }

        let today = self.today();
        {
            let mut guard = self.state();
            let state = &mut *guard;
            match mutation {
                Mutation::SetStatus(ids, status) => {
                    for user in state.users.iter_mut().filter(|u| ids.contains(&u.id)) {
                        user.status = status;
                    }
                }
                Mutation::Delete(ids) => state.users.retain(|u| !ids.contains(&u.id)),
                Mutation::ResetPassword(_) => {}
            }
            if clear_selection {
                state.selection.clear();
            } else {
                let existing: HashSet<u32> = state.users.iter().map(|u| u.id).collect();
                state.selection.retain_existing(|id| existing.contains(&id));
            }
            state.recompute(today);
        }

        info!(%success, "User mutation applied");
        self.notifications.success(success);
        Ok(())
    }
}

fn bulk_question(verb: &str, count: usize, hidden: usize, irreversible: bool) -> String {
    let mut text = format!("¿Deseas {} {} usuarios seleccionados?", verb, count);
    if hidden > 0 {
        text.push_str(&format!(
            " {} de ellos no están visibles con los filtros actuales.",
            hidden
        ));
    }
    if irreversible {
        text.push_str(" Esta acción no se puede deshacer.");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use crate::infrastructure::http::ApiError;
    use crate::infrastructure::SimulatedUserGateway;
    use crate::notifications::NotificationKind;
    use crate::support::errors::AppError;
    use crate::test_support::ScriptedDialogs;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FailingGateway;

    #[async_trait]
    impl UserGateway for FailingGateway {
        async fn load_users(&self) -> Result<Vec<UserRecord>, ApiError> {
            Err(ApiError::network("connection refused"))
        }
        async fn set_status(&self, _: &[u32], _: UserStatus) -> Result<(), ApiError> {
            Err(ApiError::rejected("Operación no permitida"))
        }
        async fn delete_users(&self, _: &[u32]) -> Result<(), ApiError> {
            Err(ApiError::rejected("Operación no permitida"))
        }
        async fn reset_password(&self, _: u32) -> Result<(), ApiError> {
            Err(ApiError::rejected("Operación no permitida"))
        }
    }

    fn config() -> UsersConfig {
        UsersConfig {
            simulated_latency_ms: 0,
            ..UsersConfig::default()
        }
    }

    fn sample_gateway(latency_ms: u64) -> Arc<dyn UserGateway> {
        Arc::new(SimulatedUserGateway::with_rng(
            Duration::from_millis(latency_ms),
            50,
            StdRng::seed_from_u64(42),
        ))
    }

    async fn mounted(dialogs: ScriptedDialogs) -> (UsersManagement, NotificationCenter) {
        let center = NotificationCenter::new(NotificationConfig::default());
        let page = UsersManagement::new(sample_gateway(0), Arc::new(dialogs), center.clone(), config());
        page.mount().await.unwrap();
        (page, center)
    }

    #[tokio::test]
    async fn search_clear_select_and_bulk_delete() {
        let (page, _) = mounted(ScriptedDialogs::confirming()).await;
        assert_eq!(page.visible_ids().len(), 50);

        page.set_search("usuario017");
        assert_eq!(page.visible_ids(), vec![17]);

        page.clear_filters();
        assert_eq!(page.visible_ids().len(), 50);

        page.toggle_user(17, true);
        page.bulk_delete().await.unwrap();

        assert_eq!(page.total(), 49);
        assert!(page.user(17).is_none());
        assert!(page.selection().is_empty());
        assert_eq!(page.visible_ids().len(), 49);
    }

    #[tokio::test]
    async fn bulk_suspend_touches_only_selected() {
        let (page, center) = mounted(ScriptedDialogs::confirming()).await;
        let before = page.users();

        for id in [3, 8, 21] {
            page.toggle_user(id, true);
        }
        page.bulk_suspend().await.unwrap();

        for (old, new) in before.iter().zip(page.users()) {
            if [3, 8, 21].contains(&old.id) {
                assert_eq!(new.status, UserStatus::Suspendido);
                assert_eq!(new.status.badge().color, "danger");
            } else {
                assert_eq!(new.status, old.status);
            }
        }
        assert_eq!(page.selected_count(), 0);
        assert!(center
            .list()
            .iter()
            .any(|n| n.message == "3 usuarios suspendidos exitosamente"));
    }

    #[tokio::test]
    async fn rejected_gateway_leaves_state_unchanged() {
        let center = NotificationCenter::new(NotificationConfig::default());
        let page = UsersManagement::new(
            Arc::new(FailingGateway),
            Arc::new(ScriptedDialogs::confirming()),
            center.clone(),
            config(),
        );
        let mut rng = StdRng::seed_from_u64(3);
        page.replace_users(crate::domain::generate_sample_users(10, &mut rng, Utc::now()));
        let before = page.users();

        page.toggle_user(1, true);
        page.toggle_user(2, true);
        let err = page.bulk_delete().await.unwrap_err();
        assert!(matches!(err, AppError::Api(_)));

        assert_eq!(page.users(), before);
        assert_eq!(page.selected_count(), 2);
        let notes = center.list();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert_eq!(notes[0].message, "Error en eliminación masiva");
    }

    #[tokio::test]
    async fn failed_mount_notifies() {
        let center = NotificationCenter::new(NotificationConfig::default());
        let page = UsersManagement::new(
            Arc::new(FailingGateway),
            Arc::new(ScriptedDialogs::confirming()),
            center.clone(),
            config(),
        );
        assert!(page.mount().await.is_err());
        assert_eq!(center.list()[0].message, "Error cargando datos de usuarios");
    }

    #[tokio::test]
    async fn selection_survives_filter_changes() {
        let (page, _) = mounted(ScriptedDialogs::confirming()).await;
        page.toggle_user(5, true);

        page.set_search("usuario040");
        assert!(!page.visible_ids().contains(&5));
        assert_eq!(page.hidden_selected(), vec![5]);
        assert_eq!(page.header_state(), HeaderCheckbox::Unchecked);

        page.clear_filters();
        assert!(page.selection().contains(5));
        assert!(page.hidden_selected().is_empty());
    }

    #[tokio::test]
    async fn bulk_confirmation_mentions_hidden_rows() {
        let dialogs = ScriptedDialogs::declining();
        let (page, _) = mounted(dialogs.clone()).await;
        page.toggle_user(5, true);
        page.toggle_user(40, true);
        page.set_search("usuario040");

        let err = page.bulk_activate().await.unwrap_err();
        assert!(err.is_cancelled());
        let shown = dialogs.shown();
        assert!(shown[0].contains("¿Deseas activar 2 usuarios seleccionados?"));
        assert!(shown[0].contains("1 de ellos no están visibles"));
        assert_eq!(page.selected_count(), 2);
    }

    #[tokio::test]
    async fn select_all_respects_filters() {
        let (page, _) = mounted(ScriptedDialogs::confirming()).await;
        page.set_search("usuario00");
        let visible = page.visible_ids();
        assert_eq!(visible.len(), 9);

        page.toggle_select_all(true);
        assert_eq!(page.header_state(), HeaderCheckbox::Checked);
        assert_eq!(page.selected_count(), 9);

        page.toggle_user(visible[0], false);
        assert_eq!(page.header_state(), HeaderCheckbox::Indeterminate);
    }

    #[tokio::test]
    async fn empty_selection_is_rejected() {
        let (page, _) = mounted(ScriptedDialogs::confirming()).await;
        let err = page.bulk_suspend().await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::EmptySelection)));
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_mutations_are_rejected() {
        let center = NotificationCenter::new(NotificationConfig::default());
        let page = UsersManagement::new(
            sample_gateway(1000),
            Arc::new(ScriptedDialogs::confirming()),
            center,
            config(),
        );
        page.mount().await.unwrap();
        page.toggle_user(1, true);

        let (first, second) = tokio::join!(page.bulk_suspend(), async {
            tokio::task::yield_now().await;
            page.activate_user(2).await
        });
        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(AppError::Domain(DomainError::InProgress(_)))
        ));
        assert_eq!(page.user(1).unwrap().status, UserStatus::Suspendido);
        assert!(!page.is_busy());
    }

    #[tokio::test]
    async fn individual_actions() {
        let (page, _) = mounted(ScriptedDialogs::confirming()).await;
        page.toggle_user(4, true);

        page.suspend_user(4).await.unwrap();
        assert_eq!(page.user(4).unwrap().status, UserStatus::Suspendido);
        page.activate_user(4).await.unwrap();
        assert_eq!(page.user(4).unwrap().status, UserStatus::Activo);
        page.reset_password(4).await.unwrap();

        page.delete_user(4).await.unwrap();
        assert!(page.user(4).is_none());
        assert!(page.selection().is_empty());

        let err = page.suspend_user(4).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::NotFound { .. })));
        assert!(page.view_details(4).is_err());
        assert_eq!(page.view_details(5).unwrap().id, "#005");
    }

    #[tokio::test(start_paused = true)]
    async fn search_is_debounced() {
        let (page, _) = mounted(ScriptedDialogs::confirming()).await;
        let (first, second) = tokio::join!(page.search_input("usu"), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            page.search_input("usuario001").await
        });
        assert!(!first);
        assert!(second);
        assert_eq!(page.filter().search(), "usuario001");
        assert_eq!(page.visible_ids(), vec![1]);
    }

    #[tokio::test]
    async fn pagination_over_visible_rows() {
        let (page, _) = mounted(ScriptedDialogs::confirming()).await;
        assert_eq!(page.pagination_label(), "Mostrando 1-25 de 50 usuarios");
        let second = page.go_to_page(2);
        assert_eq!(second.items.len(), 25);
        assert_eq!(second.items[0].id, 26);
        assert_eq!(page.go_to_page(9).page, 2);

        page.set_search("usuario01");
        assert_eq!(page.current_page().page, 1);
        assert_eq!(page.pagination_label(), "Mostrando 1-10 de 10 usuarios");
    }

    #[tokio::test]
    async fn bulk_export_writes_workbook_and_keeps_selection() {
        let (page, _) = mounted(ScriptedDialogs::confirming()).await;
        let dir = tempfile::tempdir().unwrap();
        let downloads = Downloads::new(dir.path());

        page.toggle_user(1, true);
        page.toggle_user(2, true);
        let path = page.bulk_export(&downloads).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("usuarios_export_"));
        assert!(name.ends_with(".xlsx"));
        assert_eq!(page.selected_count(), 2);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_selectable() {
        let (page, center) = mounted(ScriptedDialogs::confirming()).await;
        let before = page.users();

        page.toggle_user(999, true);
        assert_eq!(page.selected_count(), 0);
        let err = page.bulk_suspend().await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::EmptySelection)));

        page.toggle_user(7, true);
        page.toggle_user(999, true);
        page.bulk_suspend().await.unwrap();
        assert_eq!(page.user(7).unwrap().status, UserStatus::Suspendido);
        assert_eq!(page.users().len(), before.len());
        assert!(center
            .list()
            .iter()
            .any(|n| n.message == "1 usuarios suspendidos exitosamente"));
    }

    fn registered_on(id: u32, date: NaiveDate) -> UserRecord {
        UserRecord {
            id,
            username: format!("usuario{:03}", id),
            email: format!("usuario{}@biblioteca.edu.bo", id),
            first_name: format!("Nombre{}", id),
            last_name: format!("Apellido{}", id),
            ci: format!("{}", 12345678 + id),
            phone: "+591 70000000".into(),
            user_type: UserType::Estudiante,
            status: UserStatus::Activo,
            registration_date: date,
            last_access: None,
        }
    }

    #[tokio::test]
    async fn today_window_follows_the_local_calendar_day() {
        use chrono::TimeZone;

        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        for (hour, minute) in [(0, 15), (23, 45)] {
            let local = Local
                .with_ymd_and_hms(2024, 6, 10, hour, minute, 0)
                .single()
                .unwrap();
            let at = local.with_timezone(&Utc);
            let page = UsersManagement::new(
                sample_gateway(0),
                Arc::new(ScriptedDialogs::confirming()),
                NotificationCenter::new(NotificationConfig::default()),
                config(),
            )
            .with_clock(Arc::new(move || at));
            page.replace_users(vec![
                registered_on(1, day),
                registered_on(2, day.pred_opt().unwrap()),
                registered_on(3, day.succ_opt().unwrap()),
            ]);

            page.set_date_filter(Some(DateWindow::Today));
            assert_eq!(page.visible_ids(), vec![1], "local time {}", local);
        }
    }
}
