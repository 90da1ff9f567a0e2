use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent};

use api_types::{
    Activity, CategoryId, SliderId,
    category::{Category, CategoryNew, CategoryUpdate},
    company::Company,
    slider::Slider,
};
use feed_client::{FeedClient, SliderForm};
use relations::{RelationError, RelationshipManager};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui,
    ui::keymap::AppAction,
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Sliders,
    Categories,
    Companies,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sliders => "Sliders",
            Self::Categories => "Categories",
            Self::Companies => "Companies",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

impl ToastState {
    fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
            expires_at: Instant::now() + TOAST_TTL,
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionState {
    pub ok: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlidersMode {
    List,
    Form,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderField {
    Title,
    Description,
    Link,
    Image,
}

#[derive(Debug)]
pub struct SliderFormState {
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
    pub focus: SliderField,
    pub editing: Option<SliderId>,
    pub error: Option<String>,
}

impl Default for SliderFormState {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            link: String::new(),
            image: String::new(),
            focus: SliderField::Title,
            editing: None,
            error: None,
        }
    }
}

impl SliderFormState {
    fn for_edit(slider: &Slider) -> Self {
        Self {
            title: slider.title.clone(),
            description: slider.description.clone().unwrap_or_default(),
            link: slider.link.clone().unwrap_or_default(),
            editing: Some(slider.id),
            ..Self::default()
        }
    }

    fn advance_focus(&mut self) {
        self.focus = match self.focus {
            SliderField::Title => SliderField::Description,
            SliderField::Description => SliderField::Link,
            SliderField::Link => SliderField::Image,
            SliderField::Image => SliderField::Title,
        };
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            SliderField::Title => &mut self.title,
            SliderField::Description => &mut self.description,
            SliderField::Link => &mut self.link,
            SliderField::Image => &mut self.image,
        }
    }
}

#[derive(Debug)]
pub struct SlidersState {
    pub items: Vec<Slider>,
    pub selected: usize,
    pub mode: SlidersMode,
    pub form: SliderFormState,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SlidersState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            mode: SlidersMode::List,
            form: SliderFormState::default(),
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoriesMode {
    List,
    Form,
    /// Linked-companies panel for the selected category.
    Companies,
    /// Company picker for a pending link.
    LinkPicker,
    ConfirmDelete,
    ConfirmUnlink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Description,
    Order,
}

#[derive(Debug)]
pub struct CategoryFormState {
    pub name: String,
    pub description: String,
    pub order: String,
    pub activity: Activity,
    pub focus: CategoryField,
    pub editing: Option<CategoryId>,
    pub error: Option<String>,
}

impl Default for CategoryFormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            order: "0".to_string(),
            activity: Activity::Water,
            focus: CategoryField::Name,
            editing: None,
            error: None,
        }
    }
}

impl CategoryFormState {
    fn for_edit(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            order: category.order.to_string(),
            activity: category.activity,
            focus: CategoryField::Name,
            editing: Some(category.id),
            error: None,
        }
    }

    fn advance_focus(&mut self) {
        self.focus = match self.focus {
            CategoryField::Name => CategoryField::Description,
            CategoryField::Description => CategoryField::Order,
            CategoryField::Order => CategoryField::Name,
        };
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            CategoryField::Name => &mut self.name,
            CategoryField::Description => &mut self.description,
            CategoryField::Order => &mut self.order,
        }
    }

    fn toggle_activity(&mut self) {
        self.activity = match self.activity {
            Activity::Water => Activity::Land,
            Activity::Land => Activity::Water,
        };
    }
}

/// Dialog state for one category's linked companies.
#[derive(Debug, Default)]
pub struct LinkedPanel {
    pub category: Option<(CategoryId, String)>,
    pub items: Vec<Company>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct LinkPickerState {
    pub category: Option<(CategoryId, String)>,
    pub selected: usize,
}

#[derive(Debug)]
pub struct CategoriesState {
    pub items: Vec<Category>,
    pub selected: usize,
    pub mode: CategoriesMode,
    pub form: CategoryFormState,
    pub companies: LinkedPanel,
    pub picker: LinkPickerState,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for CategoriesState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            mode: CategoriesMode::List,
            form: CategoryFormState::default(),
            companies: LinkedPanel::default(),
            picker: LinkPickerState::default(),
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct CompaniesState {
    pub items: Vec<Company>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub sliders: SlidersState,
    pub categories: CategoriesState,
    pub companies: CompaniesState,
    pub toast: Option<ToastState>,
    pub last_refresh: Option<DateTime<Local>>,
    pub connection: ConnectionState,
    pub base_url: String,
}

pub struct App {
    relations: RelationshipManager<FeedClient>,
    client: FeedClient,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = FeedClient::new(&config.base_url)?;
        let state = AppState {
            section: Section::Sliders,
            sliders: SlidersState::default(),
            categories: CategoriesState::default(),
            companies: CompaniesState::default(),
            toast: None,
            last_refresh: None,
            connection: ConnectionState { ok: true },
            base_url: config.base_url,
        };

        Ok(Self {
            relations: RelationshipManager::new(client.clone()),
            client,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);
        self.load_sliders().await;

        while !self.should_quit {
            if self.state.toast.as_ref().is_some_and(ToastState::expired) {
                self.state.toast = None;
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = ui::keymap::map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return Ok(());
        }

        match self.state.section {
            Section::Sliders => self.handle_sliders_key(action).await,
            Section::Categories => self.handle_categories_key(action).await,
            Section::Companies => self.handle_companies_key(action).await,
        }

        Ok(())
    }

    async fn switch_section(&mut self, section: Section) {
        self.state.section = section;
        match section {
            Section::Sliders => {
                if self.state.sliders.items.is_empty() {
                    self.load_sliders().await;
                }
            }
            Section::Categories => {
                if self.state.categories.items.is_empty() {
                    self.load_categories().await;
                }
                // The link picker needs the catalog; warm it alongside.
                if self.state.companies.items.is_empty() {
                    self.load_companies().await;
                }
            }
            Section::Companies => {
                if self.state.companies.items.is_empty() {
                    self.load_companies().await;
                }
            }
        }
    }

    /// Section-switch keys shared by every list mode.
    async fn handle_nav_key(&mut self, ch: char) -> bool {
        match ch {
            's' | 'S' => self.switch_section(Section::Sliders).await,
            'c' | 'C' => self.switch_section(Section::Categories).await,
            'o' | 'O' => self.switch_section(Section::Companies).await,
            _ => return false,
        }
        true
    }

    // Sliders.

    async fn handle_sliders_key(&mut self, action: AppAction) {
        match self.state.sliders.mode {
            SlidersMode::List => match action {
                AppAction::Input(ch) => match ch {
                    'q' => self.should_quit = true,
                    'r' | 'R' => self.load_sliders().await,
                    'a' | 'A' => {
                        self.state.sliders.form = SliderFormState::default();
                        self.state.sliders.mode = SlidersMode::Form;
                    }
                    'e' | 'E' => {
                        if let Some(slider) = self.selected_slider() {
                            self.state.sliders.form = SliderFormState::for_edit(&slider);
                            self.state.sliders.mode = SlidersMode::Form;
                        }
                    }
                    'd' | 'D' => {
                        if self.selected_slider().is_some() {
                            self.state.sliders.mode = SlidersMode::ConfirmDelete;
                        }
                    }
                    _ => {
                        self.handle_nav_key(ch).await;
                    }
                },
                AppAction::Up => select_prev(&mut self.state.sliders.selected),
                AppAction::Down => {
                    select_next(&mut self.state.sliders.selected, self.state.sliders.items.len());
                }
                _ => {}
            },
            SlidersMode::Form => match action {
                AppAction::Cancel => {
                    self.state.sliders.form = SliderFormState::default();
                    self.state.sliders.mode = SlidersMode::List;
                }
                AppAction::NextField => self.state.sliders.form.advance_focus(),
                AppAction::Submit => self.submit_slider().await,
                AppAction::Backspace => {
                    self.state.sliders.form.active_field_mut().pop();
                }
                AppAction::Input(ch) => {
                    self.state.sliders.form.active_field_mut().push(ch);
                }
                _ => {}
            },
            SlidersMode::ConfirmDelete => match action {
                AppAction::Submit | AppAction::Input('y') | AppAction::Input('Y') => {
                    self.delete_slider().await;
                }
                AppAction::Cancel | AppAction::Input('n') | AppAction::Input('N') => {
                    self.state.sliders.mode = SlidersMode::List;
                }
                _ => {}
            },
        }
    }

    fn selected_slider(&self) -> Option<Slider> {
        self.state
            .sliders
            .items
            .get(self.state.sliders.selected)
            .cloned()
    }

    async fn load_sliders(&mut self) {
        self.state.sliders.loading = true;
        match self.client.list_sliders().await {
            Ok(items) => {
                clamp(&mut self.state.sliders.selected, items.len());
                self.state.sliders.items = items;
                self.state.sliders.error = None;
                self.mark_refresh(true);
            }
            Err(err) => {
                tracing::warn!("slider list failed: {err}");
                self.state.sliders.error = Some(format!("Failed to load sliders: {err}"));
                self.mark_refresh(false);
            }
        }
        self.state.sliders.loading = false;
    }

    async fn submit_slider(&mut self) {
        let form = &self.state.sliders.form;
        if form.title.trim().is_empty() || form.description.trim().is_empty() {
            self.state.sliders.form.error =
                Some("Title and description are required".to_string());
            return;
        }
        if form.editing.is_none() && form.image.trim().is_empty() {
            self.state.sliders.form.error = Some("Please select an image file".to_string());
            return;
        }

        let payload = SliderForm {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            link: none_if_empty(&form.link),
            image: none_if_empty(&form.image).map(Into::into),
        };

        let result = match form.editing {
            Some(id) => self.client.update_slider(id, &payload).await,
            None => self.client.create_slider(&payload).await,
        };
        let verb = if form.editing.is_some() { "update" } else { "create" };

        match result {
            Ok(()) => {
                let done = if form.editing.is_some() { "updated" } else { "created" };
                self.toast_success(format!("Slider {done} successfully"));
                self.state.sliders.form = SliderFormState::default();
                self.state.sliders.mode = SlidersMode::List;
                self.load_sliders().await;
            }
            Err(err) => {
                self.state.sliders.form.error = Some(format!("Failed to {verb} slider: {err}"));
            }
        }
    }

    async fn delete_slider(&mut self) {
        let Some(slider) = self.selected_slider() else {
            self.state.sliders.mode = SlidersMode::List;
            return;
        };
        match self.client.delete_slider(slider.id).await {
            Ok(()) => {
                self.toast_success("Slider deleted successfully".to_string());
                self.load_sliders().await;
            }
            Err(err) => self.toast_error(format!("Failed to delete slider: {err}")),
        }
        self.state.sliders.mode = SlidersMode::List;
    }

    // Categories.

    async fn handle_categories_key(&mut self, action: AppAction) {
        match self.state.categories.mode {
            CategoriesMode::List => match action {
                AppAction::Input(ch) => match ch {
                    'q' => self.should_quit = true,
                    'r' | 'R' => self.load_categories().await,
                    'a' | 'A' => {
                        self.state.categories.form = CategoryFormState::default();
                        self.state.categories.mode = CategoriesMode::Form;
                    }
                    'e' | 'E' => {
                        if let Some(category) = self.selected_category() {
                            self.state.categories.form = CategoryFormState::for_edit(&category);
                            self.state.categories.mode = CategoriesMode::Form;
                        }
                    }
                    'd' | 'D' => {
                        if self.selected_category().is_some() {
                            self.state.categories.mode = CategoriesMode::ConfirmDelete;
                        }
                    }
                    'v' | 'V' => self.open_linked_panel().await,
                    'l' | 'L' => self.open_link_picker().await,
                    _ => {
                        self.handle_nav_key(ch).await;
                    }
                },
                AppAction::Up => select_prev(&mut self.state.categories.selected),
                AppAction::Down => select_next(
                    &mut self.state.categories.selected,
                    self.state.categories.items.len(),
                ),
                _ => {}
            },
            CategoriesMode::Form => match action {
                AppAction::Cancel => {
                    self.state.categories.form = CategoryFormState::default();
                    self.state.categories.mode = CategoriesMode::List;
                }
                AppAction::NextField => self.state.categories.form.advance_focus(),
                AppAction::Left | AppAction::Right => {
                    self.state.categories.form.toggle_activity();
                }
                AppAction::Submit => self.submit_category().await,
                AppAction::Backspace => {
                    self.state.categories.form.active_field_mut().pop();
                }
                AppAction::Input(ch) => {
                    self.state.categories.form.active_field_mut().push(ch);
                }
                _ => {}
            },
            CategoriesMode::Companies => match action {
                AppAction::Cancel => self.close_linked_panel(),
                AppAction::Up => select_prev(&mut self.state.categories.companies.selected),
                AppAction::Down => select_next(
                    &mut self.state.categories.companies.selected,
                    self.state.categories.companies.items.len(),
                ),
                AppAction::Input(ch) => match ch {
                    'b' | 'B' => self.close_linked_panel(),
                    'r' | 'R' => self.reload_linked_panel().await,
                    'l' | 'L' => self.open_link_picker().await,
                    'u' | 'U' | 'd' | 'D' => {
                        let panel = &self.state.categories.companies;
                        if panel.items.get(panel.selected).is_some() {
                            self.state.categories.mode = CategoriesMode::ConfirmUnlink;
                        }
                    }
                    _ => {}
                },
                _ => {}
            },
            CategoriesMode::LinkPicker => match action {
                AppAction::Cancel => self.close_link_picker(),
                AppAction::Up => select_prev(&mut self.state.categories.picker.selected),
                AppAction::Down => select_next(
                    &mut self.state.categories.picker.selected,
                    self.state.companies.items.len(),
                ),
                AppAction::Submit => self.submit_link().await,
                _ => {}
            },
            CategoriesMode::ConfirmDelete => match action {
                AppAction::Submit | AppAction::Input('y') | AppAction::Input('Y') => {
                    self.delete_category().await;
                }
                AppAction::Cancel | AppAction::Input('n') | AppAction::Input('N') => {
                    self.state.categories.mode = CategoriesMode::List;
                }
                _ => {}
            },
            CategoriesMode::ConfirmUnlink => match action {
                AppAction::Submit | AppAction::Input('y') | AppAction::Input('Y') => {
                    self.submit_unlink().await;
                }
                AppAction::Cancel | AppAction::Input('n') | AppAction::Input('N') => {
                    self.state.categories.mode = CategoriesMode::Companies;
                }
                _ => {}
            },
        }
    }

    fn selected_category(&self) -> Option<Category> {
        self.state
            .categories
            .items
            .get(self.state.categories.selected)
            .cloned()
    }

    async fn load_categories(&mut self) {
        self.state.categories.loading = true;
        match self.client.list_categories().await {
            Ok(items) => {
                clamp(&mut self.state.categories.selected, items.len());
                self.state.categories.items = items;
                self.state.categories.error = None;
                self.mark_refresh(true);
            }
            Err(err) => {
                tracing::warn!("category list failed: {err}");
                self.state.categories.error = Some(format!("Failed to load categories: {err}"));
                self.mark_refresh(false);
            }
        }
        self.state.categories.loading = false;
    }

    async fn submit_category(&mut self) {
        let form = &self.state.categories.form;
        if form.name.trim().is_empty() {
            self.state.categories.form.error = Some("Name is required".to_string());
            return;
        }

        let name = form.name.trim().to_string();
        let description = none_if_empty(&form.description);
        let order = parse_order(&form.order);
        let activity = form.activity;

        let result = match form.editing {
            Some(id) => {
                let update = CategoryUpdate {
                    name,
                    description,
                    order,
                    activity,
                };
                self.client.update_category(id, &update).await
            }
            None => {
                let new = CategoryNew {
                    name,
                    description,
                    order,
                    activity,
                };
                self.client.create_category(&new).await
            }
        };
        let editing = self.state.categories.form.editing.is_some();

        match result {
            Ok(()) => {
                let done = if editing { "updated" } else { "created" };
                self.toast_success(format!("Category {done} successfully"));
                self.state.categories.form = CategoryFormState::default();
                self.state.categories.mode = CategoriesMode::List;
                self.load_categories().await;
            }
            Err(err) => {
                let verb = if editing { "update" } else { "create" };
                self.state.categories.form.error =
                    Some(format!("Failed to {verb} category: {err}"));
            }
        }
    }

    async fn delete_category(&mut self) {
        let Some(category) = self.selected_category() else {
            self.state.categories.mode = CategoriesMode::List;
            return;
        };
        match self.client.delete_category(category.id).await {
            Ok(()) => {
                self.toast_success("Category deleted successfully".to_string());
                self.load_categories().await;
            }
            Err(err) => self.toast_error(format!("Failed to delete category: {err}")),
        }
        self.state.categories.mode = CategoriesMode::List;
    }

    // Linked-companies panel and link picker.

    async fn open_linked_panel(&mut self) {
        let Some(category) = self.selected_category() else {
            return;
        };
        self.state.categories.companies = LinkedPanel {
            category: Some((category.id, category.name)),
            ..LinkedPanel::default()
        };
        self.state.categories.mode = CategoriesMode::Companies;
        self.reload_linked_panel().await;
    }

    async fn reload_linked_panel(&mut self) {
        let Some(category_id) = self
            .state
            .categories
            .companies
            .category
            .as_ref()
            .map(|(id, _)| *id)
        else {
            return;
        };
        self.state.categories.companies.loading = true;
        match self.relations.load_linked_companies(category_id).await {
            Ok(items) => {
                clamp(&mut self.state.categories.companies.selected, items.len());
                self.state.categories.companies.items = items;
                self.state.categories.companies.error = None;
            }
            Err(err) => {
                tracing::warn!(category_id, "linked list failed: {err}");
                // Keep whatever was on screen; stale beats blank.
                self.state.categories.companies.error = Some(format!(
                    "Failed to load companies connected to this category: {err}"
                ));
            }
        }
        self.state.categories.companies.loading = false;
    }

    fn close_linked_panel(&mut self) {
        if let Some((category_id, _)) = self.state.categories.companies.category.take() {
            self.relations.release_category(category_id);
        }
        self.state.categories.companies = LinkedPanel::default();
        self.state.categories.mode = CategoriesMode::List;
    }

    async fn open_link_picker(&mut self) {
        // From the panel the target is the open category, otherwise the
        // selected row.
        let target = self
            .state
            .categories
            .companies
            .category
            .clone()
            .or_else(|| self.selected_category().map(|c| (c.id, c.name)));
        let Some(target) = target else {
            return;
        };
        if self.state.companies.items.is_empty() {
            self.load_companies().await;
        }
        self.state.categories.picker = LinkPickerState {
            category: Some(target),
            selected: 0,
        };
        self.state.categories.mode = CategoriesMode::LinkPicker;
    }

    fn close_link_picker(&mut self) {
        let back_to_panel = self.state.categories.companies.category.is_some();
        self.state.categories.picker = LinkPickerState::default();
        self.state.categories.mode = if back_to_panel {
            CategoriesMode::Companies
        } else {
            CategoriesMode::List
        };
    }

    async fn submit_link(&mut self) {
        let picker = &self.state.categories.picker;
        let category_id = picker.category.as_ref().map(|(id, _)| *id);
        let company_id = self
            .state
            .companies
            .items
            .get(picker.selected)
            .map(|company| company.id);

        match self.relations.link(company_id, category_id).await {
            Ok(()) => {
                self.toast_success("Category linked to company successfully".to_string());
                self.close_link_picker();
                // Authoritative state comes from a re-fetch, and only the open
                // panel needs it.
                if self.state.categories.companies.category.is_some() {
                    self.reload_linked_panel().await;
                }
            }
            Err(RelationError::InvalidRequest) => {
                self.toast_error("Please select a company".to_string());
            }
            Err(RelationError::LinkFailed(detail)) => {
                self.toast_error(format!("Failed to link category: {detail}"));
            }
            Err(err) => self.toast_error(err.to_string()),
        }
    }

    async fn submit_unlink(&mut self) {
        let panel = &self.state.categories.companies;
        let category_id = panel.category.as_ref().map(|(id, _)| *id);
        let company = panel.items.get(panel.selected).cloned();
        let company_id = company.as_ref().map(|c| c.id);

        match self.relations.unlink(company_id, category_id).await {
            Ok(()) => {
                self.toast_success("Category unlinked from company successfully".to_string());
                self.state.categories.mode = CategoriesMode::Companies;
                self.reload_linked_panel().await;
            }
            Err(RelationError::UnlinkFailed(detail)) => {
                self.toast_error(format!("Failed to unlink category: {detail}"));
                self.state.categories.mode = CategoriesMode::Companies;
            }
            Err(err) => {
                self.toast_error(err.to_string());
                self.state.categories.mode = CategoriesMode::Companies;
            }
        }
    }

    // Companies.

    async fn handle_companies_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input(ch) => match ch {
                'q' => self.should_quit = true,
                'r' | 'R' => self.load_companies().await,
                _ => {
                    self.handle_nav_key(ch).await;
                }
            },
            AppAction::Up => select_prev(&mut self.state.companies.selected),
            AppAction::Down => select_next(
                &mut self.state.companies.selected,
                self.state.companies.items.len(),
            ),
            _ => {}
        }
    }

    async fn load_companies(&mut self) {
        self.state.companies.loading = true;
        match self.relations.load_company_catalog().await {
            Ok(items) => {
                clamp(&mut self.state.companies.selected, items.len());
                self.state.companies.items = items;
                self.state.companies.error = None;
                self.mark_refresh(true);
            }
            Err(err) => {
                tracing::warn!("company catalog failed: {err}");
                // The previous catalog, if any, stays on screen.
                self.state.companies.error = Some(format!("Failed to load companies: {err}"));
                self.mark_refresh(false);
            }
        }
        self.state.companies.loading = false;
    }

    fn mark_refresh(&mut self, ok: bool) {
        self.state.connection.ok = ok;
        if ok {
            self.state.last_refresh = Some(Local::now());
        }
    }

    fn toast_success(&mut self, message: String) {
        self.state.toast = Some(ToastState::new(message, ToastLevel::Success));
    }

    fn toast_error(&mut self, message: String) {
        self.state.toast = Some(ToastState::new(message, ToastLevel::Error));
    }
}

fn none_if_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Display-order field accepts anything; non-numeric input falls back to 0,
/// matching the old admin panel.
fn parse_order(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

fn clamp(selected: &mut usize, len: usize) {
    if len == 0 {
        *selected = 0;
    } else {
        *selected = (*selected).min(len - 1);
    }
}

fn select_prev(selected: &mut usize) {
    *selected = selected.saturating_sub(1);
}

fn select_next(selected: &mut usize, len: usize) {
    if len == 0 {
        return;
    }
    *selected = (*selected + 1).min(len - 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_parse_falls_back_to_zero() {
        assert_eq!(parse_order("12"), 12);
        assert_eq!(parse_order(" 3 "), 3);
        assert_eq!(parse_order(""), 0);
        assert_eq!(parse_order("boat"), 0);
        assert_eq!(parse_order("-4"), 0);
    }

    #[test]
    fn empty_fields_become_none() {
        assert_eq!(none_if_empty("  "), None);
        assert_eq!(none_if_empty(" pier 9 "), Some("pier 9".to_string()));
    }

    #[test]
    fn activity_toggle_cycles_both_tags() {
        let mut form = CategoryFormState::default();
        assert_eq!(form.activity, Activity::Water);
        form.toggle_activity();
        assert_eq!(form.activity, Activity::Land);
        form.toggle_activity();
        assert_eq!(form.activity, Activity::Water);
    }
}
