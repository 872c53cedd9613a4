//! Application state management for the terminal customer manager.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface.

use crate::domain::{
    CustomerApi, CustomerService, CustomerStore, Customer, Field, SubmitError, FILL_ALL_FIELDS_NOTICE,
};
use tracing::debug;

/// Represents the current mode of the application.
///
/// The application can be in different modes that determine how user input
/// is interpreted and what UI elements are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// List navigation mode - arrow keys move selection, shortcuts available
    Normal,
    /// Create form is focused - user is typing into the name or e-mail field
    Form,
    /// Help screen is displayed
    Help,
    /// A blocking notice is displayed and must be dismissed
    Notice,
}

/// Main application state containing the customer store and UI state.
///
/// # Examples
///
/// ```
/// use custman::application::{App, AppMode};
///
/// let app = App::default();
/// assert_eq!(app.mode, AppMode::Normal);
/// assert!(app.store.is_empty());
/// ```
#[derive(Debug)]
pub struct App {
    /// Customers currently shown in the list
    pub store: CustomerStore,
    /// Rules applied when API responses arrive
    pub service: CustomerService,
    /// Current application mode
    pub mode: AppMode,
    /// Index of the highlighted customer card
    pub selected: usize,
    /// Name field buffer
    pub name_input: String,
    /// E-mail field buffer
    pub email_input: String,
    /// Field receiving keystrokes in form mode
    pub active_field: Field,
    /// Cursor position within the active field, in characters
    pub cursor_position: usize,
    /// Whether the form fields are emptied after a successful registration
    pub clear_form_on_submit: bool,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Text of the blocking notice, if one is open
    pub notice: Option<String>,
    /// Mode to return to once the notice is dismissed
    notice_return_mode: AppMode,
    /// Whether the initial load has run
    mounted: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(CustomerService::default(), false)
    }
}

impl App {
    pub fn new(service: CustomerService, clear_form_on_submit: bool) -> Self {
        Self {
            store: CustomerStore::default(),
            service,
            mode: AppMode::Normal,
            selected: 0,
            name_input: String::new(),
            email_input: String::new(),
            active_field: Field::Name,
            cursor_position: 0,
            clear_form_on_submit,
            help_scroll: 0,
            status_message: None,
            notice: None,
            notice_return_mode: AppMode::Normal,
            mounted: false,
        }
    }

    /// Performs the initial load of the customer list.
    ///
    /// Runs at most once per application lifetime. A failed load leaves the
    /// list empty and opens a notice describing the error.
    pub fn mount(&mut self, api: &dyn CustomerApi) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        match self.service.load(api, &mut self.store) {
            Ok(count) => {
                self.selected = 0;
                self.status_message = Some(format!("Loaded {} customers", count));
            }
            Err(error) => {
                self.show_notice(format!("Error loading customers: {}", error));
            }
        }
    }

    /// Returns the customer under the selection, if any.
    pub fn selected_customer(&self) -> Option<&Customer> {
        self.store.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.store.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
    }

    /// Switches to form mode with the name field focused.
    pub fn start_form(&mut self) {
        self.mode = AppMode::Form;
        self.active_field = Field::Name;
        self.cursor_position = self.name_input.chars().count();
        self.status_message = None;
    }

    /// Leaves form mode. Field contents are kept for the next visit.
    pub fn cancel_form(&mut self) {
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    /// Moves focus to the other form field.
    pub fn toggle_field(&mut self) {
        self.active_field = match self.active_field {
            Field::Name => Field::Email,
            Field::Email => Field::Name,
        };
        self.cursor_position = self.active_input().chars().count();
    }

    pub fn active_input(&self) -> &str {
        match self.active_field {
            Field::Name => &self.name_input,
            Field::Email => &self.email_input,
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        match self.active_field {
            Field::Name => &mut self.name_input,
            Field::Email => &mut self.email_input,
        }
    }

    /// Inserts a character at the cursor in the active field.
    pub fn insert_char(&mut self, c: char) {
        let position = self.cursor_position;
        let input = self.active_input_mut();
        let byte_index = byte_offset(input, position);
        input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    /// Removes the character before the cursor.
    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let position = self.cursor_position - 1;
        let input = self.active_input_mut();
        let byte_index = byte_offset(input, position);
        input.remove(byte_index);
        self.cursor_position = position;
    }

    /// Removes the character under the cursor.
    pub fn delete_at_cursor(&mut self) {
        let position = self.cursor_position;
        let input = self.active_input_mut();
        if position < input.chars().count() {
            let byte_index = byte_offset(input, position);
            input.remove(byte_index);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.active_input().chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.active_input().chars().count();
    }

    /// Submits the create form using the current field contents.
    ///
    /// An empty field opens the "fill in all fields" notice without sending
    /// a request. A successful registration appends the new customer to the
    /// list and selects it.
    pub fn submit_form(&mut self, api: &dyn CustomerApi) {
        let name = self.name_input.clone();
        let email = self.email_input.clone();

        match self.service.submit(api, &mut self.store, &name, &email) {
            Ok(customer) => {
                self.selected = self.store.len().saturating_sub(1);
                self.status_message = Some(format!("Registered {}", customer.name));
                if self.clear_form_on_submit {
                    self.name_input.clear();
                    self.email_input.clear();
                    self.active_field = Field::Name;
                    self.cursor_position = 0;
                }
            }
            Err(SubmitError::Validation(error)) => {
                debug!(%error, "form rejected");
                self.show_notice(FILL_ALL_FIELDS_NOTICE.to_string());
            }
            Err(SubmitError::Api(error)) => {
                self.show_notice(format!("Error registering customer: {}", error));
            }
        }
    }

    /// Deletes the selected customer.
    ///
    /// The card is removed according to the delete policy; a failed request
    /// opens the delete-failure notice.
    pub fn delete_selected(&mut self, api: &dyn CustomerApi) {
        let Some(customer) = self.selected_customer() else {
            return;
        };
        let id = customer.id.clone();
        let name = customer.name.clone();

        let outcome = self.service.delete(api, &mut self.store, &id);
        self.clamp_selection();

        if outcome.removed > 0 {
            self.status_message = Some(format!("Deleted {}", name));
        }
        if let Some(notice) = outcome.notice() {
            self.show_notice(notice.to_string());
        }
    }

    /// Opens a blocking notice. Input is limited to dismissal until closed.
    pub fn show_notice(&mut self, message: String) {
        if self.mode != AppMode::Notice {
            self.notice_return_mode = self.mode;
        }
        self.notice = Some(message);
        self.mode = AppMode::Notice;
    }

    /// Closes the notice and returns to the mode that was active before it.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.mode = self.notice_return_mode;
        self.notice_return_mode = AppMode::Normal;
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }
}

fn byte_offset(input: &str, char_index: usize) -> usize {
    input.char_indices().nth(char_index).map(|(i, _)| i).unwrap_or(input.len())
}
