//! Form rendering

use crate::domain::Severity;
use crate::services::{Field, FormState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

const ACCENT: Color = Color::Rgb(0, 128, 128); // teal
const HEADER_BG: Color = Color::Rgb(231, 76, 60);

pub fn draw_ui(f: &mut Frame, state: &FormState, focus: Field) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form + tracking
            Constraint::Length(3), // Notification
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_header(f, main_chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    draw_form(f, body_chunks[0], state, focus);
    draw_tracking_panel(f, body_chunks[1], state);
    draw_notification(f, main_chunks[2], state);
    draw_footer(f, main_chunks[3], state);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Service de Livraison ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("| Créer une Réclamation"),
    ]))
    .style(Style::default().bg(HEADER_BG).fg(Color::White))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn field_block(field: Field, focus: Field) -> Block<'static> {
    let border = if field == focus { ACCENT } else { Color::DarkGray };
    Block::default()
        .title(format!(" {} ", field.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn draw_text_field(f: &mut Frame, area: Rect, state: &FormState, field: Field, focus: Field) {
    let value = state.field_value(field);
    let text = if value.is_empty() {
        Line::from(Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(value.to_string())
    };

    let paragraph = if field == Field::Description {
        let lines: Vec<Line> = if value.is_empty() {
            vec![text]
        } else {
            value.split('\n').map(|l| Line::from(l.to_string())).collect()
        };
        Paragraph::new(lines).wrap(Wrap { trim: false })
    } else {
        Paragraph::new(text)
    };

    f.render_widget(paragraph.block(field_block(field, focus)), area);
}

fn draw_form(f: &mut Frame, area: Rect, state: &FormState, focus: Field) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Barcode
            Constraint::Length(3), // Phone
            Constraint::Length(3), // Subject
            Constraint::Min(4),    // Description
            Constraint::Length(3), // Reason
            Constraint::Length(3), // Submit
        ])
        .split(area);

    draw_text_field(f, chunks[0], state, Field::Barcode, focus);
    draw_text_field(f, chunks[1], state, Field::Phone, focus);
    draw_text_field(f, chunks[2], state, Field::Subject, focus);
    draw_text_field(f, chunks[3], state, Field::Description, focus);

    let reason = Paragraph::new(Line::from(vec![
        Span::raw("◀ "),
        Span::styled(state.draft.reason.label(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ▶"),
    ]))
    .block(field_block(Field::Reason, focus));
    f.render_widget(reason, chunks[4]);

    let submit_style = if state.submitting {
        Style::default().fg(Color::DarkGray)
    } else if focus == Field::Submit {
        Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    };
    let submit = Paragraph::new(Line::from(Span::styled(state.submit_label(), submit_style)))
        .centered()
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT)));
    f.render_widget(submit, chunks[5]);
}

fn draw_tracking_panel(f: &mut Frame, area: Rect, state: &FormState) {
    let items: Vec<ListItem> = match &state.parcel {
        Some(details) if !details.evenements.is_empty() => details
            .evenements
            .iter()
            .map(|e| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<17}", e.date), Style::default().fg(Color::Cyan)),
                    Span::raw(" "),
                    Span::raw(e.summary()),
                ]))
            })
            .collect(),
        Some(_) => vec![ListItem::new("Aucun événement")],
        None => vec![ListItem::new(Span::styled(
            "Ctrl-L pour suivre le colis",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let list = List::new(items).block(
        Block::default()
            .title(" Suivi du colis ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, area);
}

fn draw_notification(f: &mut Frame, area: Rect, state: &FormState) {
    f.render_widget(Clear, area);
    let Some(notification) = &state.notification else {
        return;
    };

    let color = match notification.severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
    };
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(notification.message.clone(), Style::default().fg(color)),
        Span::styled("  [Esc]", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    f.render_widget(banner, area);
}

fn draw_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let year = time::OffsetDateTime::now_utc().year();
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("[{}] ", state.phase.as_str()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("Tab: champ suivant | Ctrl-S: envoyer | Ctrl-L: suivi | Ctrl-C: quitter | "),
        Span::styled(
            format!("© {} Service de Livraison. Tous droits réservés.", year),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    f.render_widget(footer, area);
}
