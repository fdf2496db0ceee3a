use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dermis_oracle::Oracle;
use dermis_timeline::TimelineBackend;

use super::app::{AppMode, DermApp};

pub fn handle_event<O, B>(app: &mut DermApp<O, B>, event: Event)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    if let Event::Key(key) = event {
        if key.kind == KeyEventKind::Press {
            handle_key(app, key);
        }
    }
}

fn handle_key<O, B>(app: &mut DermApp<O, B>, key: KeyEvent)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.mode {
        AppMode::Home => handle_home_key(app, key),
        AppMode::Capture => handle_capture_key(app, key),
        AppMode::Analyzing | AppMode::Comparing => handle_busy_key(app, key),
        AppMode::Result => handle_result_key(app, key),
        AppMode::Detail => handle_detail_key(app, key),
        AppMode::History => handle_history_key(app, key),
        AppMode::Compare => handle_compare_key(app, key),
    }
}

fn handle_home_key<O, B>(app: &mut DermApp<O, B>, key: KeyEvent)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char('n') => app.open_capture(),
        KeyCode::Char('h') => app.open_history(),
        KeyCode::Char('c') => app.open_compare(),
        _ => {}
    }
}

fn handle_capture_key<O, B>(app: &mut DermApp<O, B>, key: KeyEvent)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.go_home(),
        (KeyCode::Enter, _) => app.start_analysis(),
        (KeyCode::Backspace, _) => app.input_backspace(),
        (KeyCode::Delete, _) => app.input_delete(),
        (KeyCode::Left, _) => app.input_left(),
        (KeyCode::Right, _) => app.input_right(),
        (KeyCode::Home, _) => app.input_home(),
        (KeyCode::End, _) => app.input_end(),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => app.input_char(c),
        _ => {}
    }
}

fn handle_busy_key<O, B>(app: &mut DermApp<O, B>, key: KeyEvent)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    if key.code == KeyCode::Esc {
        app.abandon_request();
    }
}

fn handle_result_key<O, B>(app: &mut DermApp<O, B>, key: KeyEvent)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.leave_result(),
        KeyCode::Up => app.category_up(),
        KeyCode::Down => app.category_down(),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('n') => app.open_capture(),
        _ => {}
    }
}

fn handle_detail_key<O, B>(app: &mut DermApp<O, B>, key: KeyEvent)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
        app.close_detail();
    }
}

fn handle_history_key<O, B>(app: &mut DermApp<O, B>, key: KeyEvent)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Up => app.history_up(),
        KeyCode::Down => app.history_down(),
        KeyCode::Enter => app.history_select(),
        KeyCode::Char('c') => app.open_compare(),
        _ => {}
    }
}

fn handle_compare_key<O, B>(app: &mut DermApp<O, B>, key: KeyEvent)
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_compare_slot(),
        KeyCode::Left | KeyCode::Up => app.shift_compare(-1),
        KeyCode::Right | KeyCode::Down => app.shift_compare(1),
        KeyCode::Enter => app.start_comparison(),
        _ => {}
    }
}
