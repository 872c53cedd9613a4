use crate::application::{App, AppMode};
use crate::domain::{Customer, Field};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_form(f, app, chunks[1]);
    render_customers(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    match app.mode {
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::Notice => render_notice_popup(f, app.notice.as_deref().unwrap_or_default()),
        _ => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!("custman - Customers | {} registered", app.store.len()))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == AppMode::Form;
    let field_line = |field: Field, value: &str| {
        let label_style = if editing && app.active_field == field {
            Style::default().fg(Color::Black).bg(Color::LightGreen)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Line::from(vec![
            Span::styled(format!("{:<7}", format!("{}:", field.label())), label_style),
            Span::raw(" "),
            Span::raw(value.to_string()),
        ])
    };

    let lines = vec![
        field_line(Field::Name, &app.name_input),
        field_line(Field::Email, &app.email_input),
    ];
    let border_style = if editing { Style::default().fg(Color::Green) } else { Style::default() };
    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("New customer"),
    );
    f.render_widget(form, area);

    if editing {
        let row = match app.active_field {
            Field::Name => 0,
            Field::Email => 1,
        };
        let y = area.y + 1 + row;
        f.set_cursor_position((form_cursor_x(area, app.cursor_position), y));
    }
}

/// Column of the text cursor inside the form, kept within the panel border.
fn form_cursor_x(area: Rect, cursor_position: usize) -> u16 {
    let offset = u16::try_from(cursor_position).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1 + 8)
        .saturating_add(offset)
        .min(area.right().saturating_sub(2))
}

/// Lines shown on a customer card.
pub fn customer_card(customer: &Customer) -> Vec<Line<'_>> {
    let status_style = if customer.status {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(customer.name.as_str()),
        ]),
        Line::from(vec![
            Span::styled("E-mail: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(customer.email.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(customer.status_label(), status_style),
        ]),
        Line::from(""),
    ]
}

fn render_customers(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Customers");

    if app.store.is_empty() {
        let empty = Paragraph::new("No customers yet. Press 'a' to register one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .store
        .customers()
        .iter()
        .map(|customer| ListItem::new(customer_card(customer)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "a: new customer | d/Del: delete selected | ↑↓/jk: select | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Form => {
            let prefix = app.status_message.as_deref().map(|s| format!("{} | ", s)).unwrap_or_default();
            format!("{}Tab: switch field | Enter: register | Esc: back to list", prefix)
        }
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::Notice => "Enter/Esc: dismiss".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Form => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::Notice => Style::default().fg(Color::Yellow),
        });
    f.render_widget(input, area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_notice_popup(f: &mut Frame, message: &str) {
    let width = (message.chars().count() as u16 + 4).clamp(30, 70);
    let popup_area = centered_rect(f.area(), width, 5);

    f.render_widget(Clear, popup_area);
    let notice = Paragraph::new(vec![Line::from(message), Line::from(""), Line::from("[ OK ]")])
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Notice")
                .style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(notice, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("custman Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"CUSTMAN - TERMINAL CUSTOMER MANAGER

=== CUSTOMER LIST ===
↑↓ or j/k       Select a customer card
Home/End        Jump to first/last card
d or Delete     Delete the selected customer
                The card is removed even if the server reports an
                error, unless delete_policy = "revert_on_failure"

=== NEW CUSTOMER FORM ===
a, n or Enter   Focus the form
Tab/Shift+Tab   Switch between Name and E-mail
Enter           Register the customer
Esc             Return to the list
                Both fields are required

=== NOTICES ===
Enter/Esc/Space Dismiss the notice
                Other keys are ignored while a notice is open

=== CONFIGURATION ===
custman.toml    [api] base_url, timeout_secs
                [ui] delete_policy, clear_form_on_submit
                [logging] level, file
CUSTMAN_API_URL Overrides api.base_url

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
