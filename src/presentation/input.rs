use crate::application::{App, AppMode};
use crate::domain::CustomerApi;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, api: &dyn CustomerApi, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, api, key),
            AppMode::Form => Self::handle_form_mode(app, api, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Notice => Self::handle_notice_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, api: &dyn CustomerApi, key: KeyCode) {
        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.select_previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.select_next();
            }
            KeyCode::Home => {
                app.selected = 0;
            }
            KeyCode::End => {
                app.selected = app.store.len().saturating_sub(1);
            }
            KeyCode::Char('a') | KeyCode::Char('n') | KeyCode::Enter => {
                app.start_form();
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                app.delete_selected(api);
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.show_help();
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_form_mode(app: &mut App, api: &dyn CustomerApi, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Enter => {
                app.submit_form(api);
            }
            KeyCode::Esc => {
                app.cancel_form();
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                app.toggle_field();
            }
            KeyCode::Backspace => {
                app.delete_before_cursor();
            }
            KeyCode::Delete => {
                app.delete_at_cursor();
            }
            KeyCode::Left => {
                app.move_cursor_left();
            }
            KeyCode::Right => {
                app.move_cursor_right();
            }
            KeyCode::Home => {
                app.move_cursor_home();
            }
            KeyCode::End => {
                app.move_cursor_end();
            }
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.insert_char(c);
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_notice_mode(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::tests::{customer, FakeApi};
    use crate::domain::{Field, FILL_ALL_FIELDS_NOTICE};

    fn press(app: &mut App, api: &FakeApi, key: KeyCode) {
        InputHandler::handle_key_event(app, api, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, api: &FakeApi, text: &str) {
        for c in text.chars() {
            press(app, api, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_register_customer_with_keys() {
        let api = FakeApi::default();
        let mut app = App::default();

        press(&mut app, &api, KeyCode::Char('a'));
        assert_eq!(app.mode, AppMode::Form);

        type_text(&mut app, &api, "Ana");
        press(&mut app, &api, KeyCode::Tab);
        type_text(&mut app, &api, "ana@example.com");
        press(&mut app, &api, KeyCode::Enter);

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.customers()[0].name, "Ana");
        assert_eq!(app.store.customers()[0].email, "ana@example.com");
        assert_eq!(app.mode, AppMode::Form);
    }

    #[test]
    fn test_typing_d_in_form_does_not_delete() {
        let api = FakeApi::with_customers(vec![customer("1", "Ana")]);
        let mut app = App::default();
        app.mount(&api);

        press(&mut app, &api, KeyCode::Char('n'));
        type_text(&mut app, &api, "dd");

        assert_eq!(app.name_input, "dd");
        assert_eq!(app.store.len(), 1);
        assert!(api.deleted.borrow().is_empty());
    }

    #[test]
    fn test_notice_blocks_other_keys() {
        let api = FakeApi::with_customers(vec![customer("1", "Ana")]);
        let mut app = App::default();
        app.mount(&api);
        app.start_form();
        press(&mut app, &api, KeyCode::Enter);
        assert_eq!(app.notice.as_deref(), Some(FILL_ALL_FIELDS_NOTICE));

        type_text(&mut app, &api, "xyz");
        press(&mut app, &api, KeyCode::Tab);
        assert_eq!(app.mode, AppMode::Notice);
        assert!(app.name_input.is_empty());
        assert_eq!(app.active_field, Field::Name);

        press(&mut app, &api, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Form);
    }

    #[test]
    fn test_delete_key_on_selected_card() {
        let api = FakeApi::with_customers(vec![customer("1", "Ana"), customer("2", "Bob")]);
        let mut app = App::default();
        app.mount(&api);

        press(&mut app, &api, KeyCode::Down);
        press(&mut app, &api, KeyCode::Char('d'));

        assert_eq!(api.deleted.borrow().as_slice(), &["2".to_string()]);
        assert_eq!(app.store.customers(), &[customer("1", "Ana")]);
    }

    #[test]
    fn test_escape_leaves_form() {
        let api = FakeApi::default();
        let mut app = App::default();
        press(&mut app, &api, KeyCode::Enter);
        type_text(&mut app, &api, "Bo");
        press(&mut app, &api, KeyCode::Esc);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.name_input, "Bo");
    }

    #[test]
    fn test_help_navigation() {
        let api = FakeApi::default();
        let mut app = App::default();

        press(&mut app, &api, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, &api, KeyCode::PageDown);
        press(&mut app, &api, KeyCode::Char('k'));
        assert_eq!(app.help_scroll, 4);
        press(&mut app, &api, KeyCode::Home);
        assert_eq!(app.help_scroll, 0);
        press(&mut app, &api, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Normal);
    }
}
