//! Input handling for fix-review

use crate::endpoint::Dispatcher;
use crate::session::ReviewMode;
use crate::ui::{App, Overlay};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ═══════════════════════════════════════════════════════════════════════════
//  MAIN INPUT DISPATCHER
// ═══════════════════════════════════════════════════════════════════════════

/// Main key event handler - overlays first, then the panels
pub fn handle_key_event<D: Dispatcher>(app: &mut App<D>, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.abort();
        return;
    }

    // Nothing to do while the close request is in flight
    if app.closing_since.is_some() {
        return;
    }

    match app.overlay {
        Overlay::ConfirmApplyAll => handle_confirm_input(app, key),
        Overlay::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.cancel_overlay();
            }
        }
        Overlay::None => handle_normal_mode(app, key),
    }
}

fn handle_confirm_input<D: Dispatcher>(app: &mut App<D>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_end_review(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_overlay(),
        _ => {}
    }
}

fn handle_normal_mode<D: Dispatcher>(app: &mut App<D>, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.toggle_panel(),
        KeyCode::Down | KeyCode::Char('j') => app.navigate_down(),
        KeyCode::Up | KeyCode::Char('k') => app.navigate_up(),
        KeyCode::PageDown => app.page(20),
        KeyCode::PageUp => app.page(-20),
        KeyCode::Enter => app.activate(),
        KeyCode::Char(' ') => app.toggle_selected_fix(),
        KeyCode::Char('g') => app.select_mode(ReviewMode::Global),
        KeyCode::Char('m') => app.select_mode(ReviewMode::Manual),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('q') => app.request_end_review(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Request;
    use crate::ui::tests::app_with_file;
    use crate::ui::ActivePanel;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_c_aborts_without_closing() {
        let (mut app, recorder) = app_with_file();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(!app.session.is_closed());
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_q_then_n_keeps_reviewing() {
        let (mut app, recorder) = app_with_file();
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert_eq!(app.overlay, Overlay::ConfirmApplyAll);
        handle_key_event(&mut app, press(KeyCode::Char('n')));
        assert_eq!(app.overlay, Overlay::None);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_g_then_q_closes_globally() {
        let (mut app, recorder) = app_with_file();
        handle_key_event(&mut app, press(KeyCode::Char('g')));
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert_eq!(
            *recorder.0.borrow(),
            vec![
                Request::Clear,
                Request::Close {
                    mode: ReviewMode::Global
                }
            ]
        );

        // keys are ignored while closing
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, ActivePanel::Files);
    }

    #[test]
    fn test_navigation_keys() {
        let (mut app, _recorder) = app_with_file();
        handle_key_event(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.tree_selected, 1);
        handle_key_event(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.tree_selected, 0);
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, ActivePanel::Fixes);
    }
}
