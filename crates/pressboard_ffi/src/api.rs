//! FFI use-case API for the dashboard front end.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions via FRB.
//! - Translate core results into flat envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call returns an envelope; failures carry `ok=false` and a message.
//! - The editor and reference services are built once per process from
//!   `PRESSBOARD_*` env config and share one HTTP client.
//! - Only calls that never touch the network are `sync`; request-sending
//!   calls run on FRB worker threads so saving flags stay observable.

use once_cell::sync::{Lazy, OnceCell};
use pressboard_core::model::date_range::{format_api_date, parse_api_date};
use pressboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ApiClient, ApiConfig, ClassificationEditor, DateRange, HttpClassificationEditor,
    HttpNewsRepository, HttpPortalRepository, HttpStrategicWeekRepository, NewPortal,
    NewStrategicWeek, NewsItem, NewsItemId, NotificationKind, NotificationLog, Portal,
    PortalService, Sentiment, StrategicWeek, ValidationError, ViewFilter, WeekService,
};
use std::sync::Arc;
use uuid::Uuid;

static NOTIFICATIONS: Lazy<Arc<NotificationLog>> = Lazy::new(|| Arc::new(NotificationLog::new()));
static BRIDGE: OnceCell<Bridge> = OnceCell::new();

struct Bridge {
    editor: HttpClassificationEditor,
    weeks: WeekService<HttpStrategicWeekRepository>,
    portals: PortalService<HttpPortalRepository>,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItemView {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub portal: Option<String>,
    /// `positive|negative|neutral`.
    pub sentiment: Option<String>,
    pub is_strategic: bool,
    pub cycle: Option<u32>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// Response for dashboard loads and row listings.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<NewsItemView>,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
}

impl DashboardResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            items: Vec::new(),
            positive_pct: 0.0,
            negative_pct: 0.0,
            neutral_pct: 0.0,
        }
    }
}

/// Response for a single classification edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemActionResponse {
    pub ok: bool,
    /// Confirmed row after a successful save.
    pub item: Option<NewsItemView>,
    pub message: String,
}

impl ItemActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item: None,
            message: message.into(),
        }
    }
}

/// Enable/saving flags for the four controls of one row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemControlsResponse {
    pub ok: bool,
    pub message: String,
    pub strategic_enabled: bool,
    pub cycle_enabled: bool,
    pub category_enabled: bool,
    pub subcategory_enabled: bool,
    pub strategic_saving: bool,
    pub cycle_saving: bool,
    pub category_saving: bool,
    pub subcategory_saving: bool,
}

/// Options for the category/subcategory selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsResponse {
    pub ok: bool,
    pub message: String,
    pub options: Vec<String>,
}

/// Options for the cycle select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOptionsResponse {
    pub ok: bool,
    pub message: String,
    pub cycles: Vec<u32>,
}

/// Toast to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiNotification {
    pub destructive: bool,
    pub title: String,
    pub description: Option<String>,
}

/// One strategic week row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategicWeekView {
    pub id: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    pub end_date: String,
    pub cycle: u32,
    pub category: String,
    pub subcategory: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategicWeeksResponse {
    pub ok: bool,
    pub message: String,
    pub weeks: Vec<StrategicWeekView>,
}

/// One monitored source portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalView {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalsResponse {
    pub ok: bool,
    pub message: String,
    pub portals: Vec<PortalView>,
}

/// Response for create/delete of reference records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceActionResponse {
    pub ok: bool,
    /// Id of the created or deleted record.
    pub id: Option<String>,
    pub message: String,
}

impl ReferenceActionResponse {
    fn success(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Loads news rows (and the strategic vocabulary) for the dashboard.
///
/// Dates accept `YYYY-MM-DD` or `DD/MM/YYYY`; a reversed range is swapped.
pub fn dashboard_load(
    start_date: Option<String>,
    end_date: Option<String>,
    strategic_only: bool,
) -> DashboardResponse {
    let range = match DateRange::normalize(start_date.as_deref(), end_date.as_deref()) {
        Ok(range) => range,
        Err(err) => return DashboardResponse::failure(format!("dashboard_load failed: {err}")),
    };
    let view = if strategic_only {
        ViewFilter::StrategicOnly
    } else {
        ViewFilter::All
    };

    match with_editor(|editor| {
        editor.reload_vocabulary()?;
        editor.load_items(range, view)
    }) {
        Ok(Ok(count)) => dashboard_snapshot(format!("Loaded {count} news item(s).")),
        Ok(Err(err)) => DashboardResponse::failure(format!("dashboard_load failed: {err}")),
        Err(message) => DashboardResponse::failure(message),
    }
}

/// Current visible rows without a fetch.
#[flutter_rust_bridge::frb(sync)]
pub fn news_items() -> DashboardResponse {
    dashboard_snapshot(String::new())
}

pub fn set_strategic(item_id: String, checked: bool) -> ItemActionResponse {
    edit_item(&item_id, "set_strategic", |editor, id| {
        editor.set_strategic(id, checked)
    })
}

/// `cycle=None` clears the cycle and its children; `Some(0)` is rejected.
pub fn set_cycle(item_id: String, cycle: Option<u32>) -> ItemActionResponse {
    if cycle == Some(0) {
        return ItemActionResponse::failure(format!(
            "set_cycle failed: {}",
            ValidationError::NonPositiveCycle
        ));
    }
    edit_item(&item_id, "set_cycle", |editor, id| editor.set_cycle(id, cycle))
}

/// Blank or `None` clears the category and the subcategory.
pub fn set_category(item_id: String, category: Option<String>) -> ItemActionResponse {
    let category = normalize_label(category);
    edit_item(&item_id, "set_category", |editor, id| {
        editor.set_category(id, category)
    })
}

/// Blank or `None` clears the subcategory.
pub fn set_subcategory(item_id: String, subcategory: Option<String>) -> ItemActionResponse {
    let subcategory = normalize_label(subcategory);
    edit_item(&item_id, "set_subcategory", |editor, id| {
        editor.set_subcategory(id, subcategory)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn item_controls(item_id: String) -> ItemControlsResponse {
    let id = match parse_item_id(&item_id) {
        Ok(id) => id,
        Err(message) => return controls_failure(message),
    };
    match with_editor(|editor| editor.controls(id)) {
        Ok(Some(controls)) => ItemControlsResponse {
            ok: true,
            message: String::new(),
            strategic_enabled: controls.strategic.enabled,
            cycle_enabled: controls.cycle.enabled,
            category_enabled: controls.category.enabled,
            subcategory_enabled: controls.subcategory.enabled,
            strategic_saving: controls.strategic.saving,
            cycle_saving: controls.cycle.saving,
            category_saving: controls.category.saving,
            subcategory_saving: controls.subcategory.saving,
        },
        Ok(None) => controls_failure(format!("news item not loaded: {id}")),
        Err(message) => controls_failure(message),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn available_cycles() -> CycleOptionsResponse {
    match with_editor(|editor| editor.available_cycles()) {
        Ok(cycles) => CycleOptionsResponse {
            ok: true,
            message: String::new(),
            cycles,
        },
        Err(message) => CycleOptionsResponse {
            ok: false,
            message,
            cycles: Vec::new(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn available_categories(cycle: Option<u32>) -> OptionsResponse {
    options_response(with_editor(|editor| editor.available_categories(cycle)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn available_subcategories(cycle: Option<u32>, category: Option<String>) -> OptionsResponse {
    let category = normalize_label(category);
    options_response(with_editor(|editor| {
        editor.available_subcategories(cycle, category.as_deref())
    }))
}

/// Re-fetches strategic weeks so every select sees the new vocabulary.
pub fn reload_vocabulary() -> CycleOptionsResponse {
    match with_editor(|editor| editor.reload_vocabulary().map(|_| editor.available_cycles())) {
        Ok(Ok(cycles)) => CycleOptionsResponse {
            ok: true,
            message: format!("{} cycle(s) available.", cycles.len()),
            cycles,
        },
        Ok(Err(err)) => CycleOptionsResponse {
            ok: false,
            message: format!("reload_vocabulary failed: {err}"),
            cycles: Vec::new(),
        },
        Err(message) => CycleOptionsResponse {
            ok: false,
            message,
            cycles: Vec::new(),
        },
    }
}

pub fn list_strategic_weeks() -> StrategicWeeksResponse {
    match with_bridge(|bridge| bridge.weeks.list_weeks()) {
        Ok(Ok(weeks)) => StrategicWeeksResponse {
            ok: true,
            message: String::new(),
            weeks: weeks.iter().map(to_week_view).collect(),
        },
        Ok(Err(err)) => StrategicWeeksResponse {
            ok: false,
            message: format!("list_strategic_weeks failed: {err}"),
            weeks: Vec::new(),
        },
        Err(message) => StrategicWeeksResponse {
            ok: false,
            message,
            weeks: Vec::new(),
        },
    }
}

/// Creates a strategic week and reloads the editor vocabulary.
pub fn create_strategic_week(
    start_date: String,
    end_date: String,
    cycle: u32,
    category: String,
    subcategory: String,
) -> ReferenceActionResponse {
    let request = match parse_week_request(&start_date, &end_date, cycle, category, subcategory) {
        Ok(request) => request,
        Err(err) => {
            return ReferenceActionResponse::failure(format!("create_strategic_week failed: {err}"))
        }
    };

    match with_bridge(|bridge| {
        bridge
            .weeks
            .create_week(&request)
            .map(|created| (created, bridge.editor.reload_vocabulary()))
    }) {
        Ok(Ok((created, reload))) => ReferenceActionResponse::success(
            vocabulary_message("Strategic week created.", reload),
            created.id.to_string(),
        ),
        Ok(Err(err)) => {
            ReferenceActionResponse::failure(format!("create_strategic_week failed: {err}"))
        }
        Err(message) => {
            ReferenceActionResponse::failure(format!("create_strategic_week failed: {message}"))
        }
    }
}

/// Deletes a strategic week and reloads the editor vocabulary.
pub fn delete_strategic_week(week_id: String) -> ReferenceActionResponse {
    let id = match parse_uuid(&week_id, "week id") {
        Ok(id) => id,
        Err(message) => {
            return ReferenceActionResponse::failure(format!(
                "delete_strategic_week failed: {message}"
            ))
        }
    };

    match with_bridge(|bridge| {
        bridge
            .weeks
            .delete_week(id)
            .map(|()| bridge.editor.reload_vocabulary())
    }) {
        Ok(Ok(reload)) => ReferenceActionResponse::success(
            vocabulary_message("Strategic week deleted.", reload),
            id.to_string(),
        ),
        Ok(Err(err)) => {
            ReferenceActionResponse::failure(format!("delete_strategic_week failed: {err}"))
        }
        Err(message) => {
            ReferenceActionResponse::failure(format!("delete_strategic_week failed: {message}"))
        }
    }
}

pub fn list_portals() -> PortalsResponse {
    match with_bridge(|bridge| bridge.portals.list_portals()) {
        Ok(Ok(portals)) => PortalsResponse {
            ok: true,
            message: String::new(),
            portals: portals.iter().map(to_portal_view).collect(),
        },
        Ok(Err(err)) => PortalsResponse {
            ok: false,
            message: format!("list_portals failed: {err}"),
            portals: Vec::new(),
        },
        Err(message) => PortalsResponse {
            ok: false,
            message,
            portals: Vec::new(),
        },
    }
}

pub fn create_portal(name: String, url: String) -> ReferenceActionResponse {
    let request = match (NewPortal { name, url }).normalized() {
        Ok(request) => request,
        Err(err) => return ReferenceActionResponse::failure(format!("create_portal failed: {err}")),
    };

    match with_bridge(|bridge| bridge.portals.create_portal(&request)) {
        Ok(Ok(created)) => {
            ReferenceActionResponse::success("Portal added.", created.id.to_string())
        }
        Ok(Err(err)) => ReferenceActionResponse::failure(format!("create_portal failed: {err}")),
        Err(message) => {
            ReferenceActionResponse::failure(format!("create_portal failed: {message}"))
        }
    }
}

pub fn delete_portal(portal_id: String) -> ReferenceActionResponse {
    let id = match parse_uuid(&portal_id, "portal id") {
        Ok(id) => id,
        Err(message) => {
            return ReferenceActionResponse::failure(format!("delete_portal failed: {message}"))
        }
    };

    match with_bridge(|bridge| bridge.portals.delete_portal(id)) {
        Ok(Ok(())) => ReferenceActionResponse::success("Portal removed.", id.to_string()),
        Ok(Err(err)) => ReferenceActionResponse::failure(format!("delete_portal failed: {err}")),
        Err(message) => {
            ReferenceActionResponse::failure(format!("delete_portal failed: {message}"))
        }
    }
}

/// Returns and clears pending toasts, oldest first.
#[flutter_rust_bridge::frb(sync)]
pub fn drain_notifications() -> Vec<UiNotification> {
    NOTIFICATIONS
        .drain()
        .into_iter()
        .map(|notification| UiNotification {
            destructive: notification.kind == NotificationKind::Destructive,
            title: notification.title,
            description: notification.description,
        })
        .collect()
}

fn with_bridge<T>(f: impl FnOnce(&Bridge) -> T) -> Result<T, String> {
    let bridge = BRIDGE.get_or_try_init(build_bridge)?;
    Ok(f(bridge))
}

fn with_editor<T>(f: impl FnOnce(&HttpClassificationEditor) -> T) -> Result<T, String> {
    with_bridge(|bridge| f(&bridge.editor))
}

fn build_bridge() -> Result<Bridge, String> {
    let config = ApiConfig::from_env().map_err(|err| format!("api config invalid: {err}"))?;
    let client =
        ApiClient::new(&config).map_err(|err| format!("api client init failed: {err}"))?;
    let notifier: Arc<NotificationLog> = Arc::clone(&NOTIFICATIONS);

    let editor = ClassificationEditor::new(
        HttpNewsRepository::new(client.clone()),
        HttpStrategicWeekRepository::new(client.clone()),
        notifier.clone(),
        config.edit_ordering,
    );
    let weeks = WeekService::new(HttpStrategicWeekRepository::new(client.clone()), notifier.clone());
    let portals = PortalService::new(HttpPortalRepository::new(client), notifier);

    log::info!(
        "event=bridge_init module=ffi status=ok ordering={:?}",
        config.edit_ordering
    );
    Ok(Bridge {
        editor,
        weeks,
        portals,
    })
}

fn parse_week_request(
    start_date: &str,
    end_date: &str,
    cycle: u32,
    category: String,
    subcategory: String,
) -> Result<NewStrategicWeek, ValidationError> {
    NewStrategicWeek {
        start_date: parse_api_date(start_date)?,
        end_date: parse_api_date(end_date)?,
        cycle,
        category,
        subcategory,
    }
    .normalized()
}

fn vocabulary_message(
    done: &str,
    reload: Result<usize, pressboard_core::EditorError>,
) -> String {
    match reload {
        Ok(_) => done.to_string(),
        Err(err) => format!("{done} Vocabulary reload failed: {err}"),
    }
}

fn edit_item(
    item_id: &str,
    action: &str,
    f: impl FnOnce(
        &HttpClassificationEditor,
        NewsItemId,
    ) -> Result<NewsItem, pressboard_core::EditorError>,
) -> ItemActionResponse {
    let id = match parse_item_id(item_id) {
        Ok(id) => id,
        Err(message) => return ItemActionResponse::failure(format!("{action} failed: {message}")),
    };
    match with_editor(|editor| f(editor, id)) {
        Ok(Ok(item)) => ItemActionResponse {
            ok: true,
            item: Some(to_view(&item)),
            message: "Saved.".to_string(),
        },
        Ok(Err(err)) => ItemActionResponse::failure(format!("{action} failed: {err}")),
        Err(message) => ItemActionResponse::failure(format!("{action} failed: {message}")),
    }
}

fn dashboard_snapshot(message: String) -> DashboardResponse {
    match with_editor(|editor| (editor.visible_items(), editor.sentiment_totals())) {
        Ok((items, totals)) => {
            let breakdown = totals.breakdown();
            DashboardResponse {
                ok: true,
                message,
                items: items.iter().map(to_view).collect(),
                positive_pct: breakdown.positive_pct,
                negative_pct: breakdown.negative_pct,
                neutral_pct: breakdown.neutral_pct,
            }
        }
        Err(message) => DashboardResponse::failure(message),
    }
}

fn options_response(result: Result<Vec<String>, String>) -> OptionsResponse {
    match result {
        Ok(options) => OptionsResponse {
            ok: true,
            message: String::new(),
            options,
        },
        Err(message) => OptionsResponse {
            ok: false,
            message,
            options: Vec::new(),
        },
    }
}

fn controls_failure(message: impl Into<String>) -> ItemControlsResponse {
    ItemControlsResponse {
        ok: false,
        message: message.into(),
        ..ItemControlsResponse::default()
    }
}

fn parse_item_id(raw: &str) -> Result<NewsItemId, String> {
    parse_uuid(raw, "item id")
}

fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid {what} `{}`", raw.trim()))
}

fn normalize_label(value: Option<String>) -> Option<String> {
    value
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
}

fn to_view(item: &NewsItem) -> NewsItemView {
    NewsItemView {
        id: item.id.to_string(),
        title: item.title.clone(),
        url: item.url.clone(),
        portal: item.portal.clone(),
        sentiment: item.sentiment.map(sentiment_label).map(str::to_string),
        is_strategic: item.is_strategic,
        cycle: item.cycle,
        category: item.category.clone(),
        subcategory: item.subcategory.clone(),
    }
}

fn to_week_view(week: &StrategicWeek) -> StrategicWeekView {
    StrategicWeekView {
        id: week.id.to_string(),
        start_date: format_api_date(week.start_date),
        end_date: format_api_date(week.end_date),
        cycle: week.cycle,
        category: week.category.clone(),
        subcategory: week.subcategory.clone(),
    }
}

fn to_portal_view(portal: &Portal) -> PortalView {
    PortalView {
        id: portal.id.to_string(),
        name: portal.name.clone(),
        url: portal.url.clone(),
    }
}

fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "positive",
        Sentiment::Negative => "negative",
        Sentiment::Neutral => "neutral",
    }
}
