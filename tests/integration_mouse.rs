use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::MouseButton;
use term_dlg::commands::ResultCode;
use term_dlg::components::Button;
use term_dlg::drivers::InputEvent;
use term_dlg::drivers::headless::HeadlessDriver;
use term_dlg::geometry::{PosFlags, Rect};
use term_dlg::state::{Phase, StateFlags, WidgetOptions};
use term_dlg::window::{
    DefaultCallback, DialogSpec, InsertPos, MouseEvent, MouseKind, MouseMsg, MouseStatus,
    WidgetCallback, WidgetHandle,
};
use term_dlg::{CbResult, WindowManager, WmConfig};

fn manager_with(config: WmConfig) -> WindowManager {
    WindowManager::new(Box::new(HeadlessDriver::new(80, 24)), config).unwrap()
}

fn down(x: i32, y: i32) -> MouseEvent {
    MouseEvent::new(MouseKind::Down(MouseButton::Left), x, y)
}

fn up(x: i32, y: i32) -> MouseEvent {
    MouseEvent::new(MouseKind::Up(MouseButton::Left), x, y)
}

/// Records mouse messages with their local coordinates.
#[derive(Default)]
struct Pointer {
    seen: RefCell<Vec<(MouseMsg, i32, i32)>>,
    repeat: bool,
}

impl WidgetCallback for Pointer {
    fn mouse_callback(
        &self,
        _wm: &mut WindowManager,
        _w: WidgetHandle,
        msg: MouseMsg,
        event: &mut MouseEvent,
    ) -> CbResult {
        self.seen.borrow_mut().push((msg, event.x, event.y));
        event.result.repeat = self.repeat;
        CbResult::Handled
    }
}

#[test]
fn topmost_child_gets_the_event_in_local_coordinates() {
    let mut wm = manager_with(WmConfig::default());
    let d = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    let back = Rc::new(Pointer::default());
    let front = Rc::new(Pointer::default());
    let wb = wm.create_widget(
        Rect::new(2, 2, 3, 10),
        PosFlags::KEEP_DEFAULT,
        WidgetOptions::SELECTABLE,
        Rc::clone(&back) as Rc<dyn WidgetCallback>,
    );
    let wf = wm.create_widget(
        Rect::new(3, 5, 3, 10),
        PosFlags::KEEP_DEFAULT,
        WidgetOptions::SELECTABLE,
        Rc::clone(&front) as Rc<dyn WidgetCallback>,
    );
    wm.add_widget(d, wb, InsertPos::Append);
    wm.add_widget(d, wf, InsertPos::Append);
    wm.init_dialog(d);

    // Overlap cell: both widgets contain (x=8, y=4).
    wm.process_event(d, InputEvent::Mouse(down(8, 4)));
    assert_eq!(front.seen.borrow().as_slice(), &[(MouseMsg::Down, 3, 1)]);
    assert!(back.seen.borrow().is_empty());
    assert_eq!(wm.widget(d).mouse_status(), MouseStatus::Normal);

    wm.process_event(d, InputEvent::Mouse(up(8, 4)));
    assert_eq!(
        front.seen.borrow().as_slice(),
        &[(MouseMsg::Down, 3, 1), (MouseMsg::Up, 3, 1), (MouseMsg::Click, 3, 1)]
    );
}

#[test]
fn hidden_and_disabled_children_are_skipped() {
    let mut wm = manager_with(WmConfig::default());
    let d = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    let back = Rc::new(Pointer::default());
    let front = Rc::new(Pointer::default());
    let wb = wm.create_widget(
        Rect::new(2, 2, 3, 10),
        PosFlags::KEEP_DEFAULT,
        WidgetOptions::SELECTABLE,
        Rc::clone(&back) as Rc<dyn WidgetCallback>,
    );
    let wf = wm.create_widget(
        Rect::new(2, 2, 3, 10),
        PosFlags::KEEP_DEFAULT,
        WidgetOptions::SELECTABLE,
        Rc::clone(&front) as Rc<dyn WidgetCallback>,
    );
    wm.add_widget(d, wb, InsertPos::Append);
    wm.add_widget(d, wf, InsertPos::Append);
    wm.init_dialog(d);

    wm.set_state(wf, StateFlags::DISABLED, true);
    wm.process_event(d, InputEvent::Mouse(down(4, 4)));
    assert!(front.seen.borrow().is_empty());
    assert_eq!(back.seen.borrow().len(), 1);
}

#[test]
fn repeat_request_is_stored_as_mouse_status() {
    let mut wm = manager_with(WmConfig::default());
    let d = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    let pointer = Rc::new(Pointer {
        repeat: true,
        ..Pointer::default()
    });
    let w = wm.create_widget(
        Rect::new(1, 1, 1, 3),
        PosFlags::KEEP_DEFAULT,
        WidgetOptions::empty(),
        pointer as Rc<dyn WidgetCallback>,
    );
    wm.add_widget(d, w, InsertPos::Append);
    wm.init_dialog(d);
    wm.process_event(d, InputEvent::Mouse(down(3, 2)));
    assert_eq!(wm.widget(d).mouse_status(), MouseStatus::Repeat);
}

#[test]
fn clicking_a_button_presses_it() {
    let mut wm = manager_with(WmConfig::default());
    let d = wm.create_dialog(
        DialogSpec::new(Rect::new(0, 0, 10, 40)).modal(true),
        Rc::new(DefaultCallback),
    );
    let ok = Button::new("&Ok", ResultCode::Enter).create(&mut wm, 5, 4);
    let no = Button::new("&No", ResultCode::Cancel).create(&mut wm, 5, 14);
    wm.add_widget(d, ok, InsertPos::Append);
    wm.add_widget(d, no, InsertPos::Append);
    wm.init_dialog(d);
    assert_eq!(wm.widget(d).current(), Some(no));

    // `ok` covers columns 4..10 of row 5; 1-based that is x 5..=10, y 6.
    wm.process_event(d, InputEvent::Mouse(down(6, 6)));
    assert_eq!(wm.widget(d).current(), Some(ok));
    assert_eq!(wm.phase(d), Phase::Active);
    wm.process_event(d, InputEvent::Mouse(up(6, 6)));
    assert_eq!(wm.ret_value(d), ResultCode::Enter);
    assert_eq!(wm.phase(d), Phase::Closed);
}

#[test]
fn release_outside_does_not_click() {
    let mut wm = manager_with(WmConfig::default());
    let d = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    let ok = Button::new("&Ok", ResultCode::Enter).create(&mut wm, 5, 4);
    wm.add_widget(d, ok, InsertPos::Append);
    wm.init_dialog(d);
    wm.process_event(d, InputEvent::Mouse(down(6, 6)));
    wm.process_event(d, InputEvent::Mouse(up(30, 9)));
    assert_eq!(wm.phase(d), Phase::Active);
    assert!(!wm.widget(ok).has_mouse_capture());
}

#[test]
fn click_outside_closes_dialog_when_enabled() {
    let mut wm = manager_with(WmConfig::default().with_mouse_close_dialog(true));
    let d = wm.create_dialog(
        DialogSpec::new(Rect::new(5, 10, 6, 20)).modal(true),
        Rc::new(DefaultCallback),
    );
    wm.init_dialog(d);
    wm.process_event(d, InputEvent::Mouse(down(12, 8)));
    assert_eq!(wm.phase(d), Phase::Active);
    wm.process_event(d, InputEvent::Mouse(down(2, 2)));
    assert_eq!(wm.phase(d), Phase::Closed);
    assert_eq!(wm.ret_value(d), ResultCode::Cancel);
}

#[test]
fn click_outside_is_ignored_when_disabled_or_fullscreen() {
    let mut wm = manager_with(WmConfig::default());
    let d = wm.create_dialog(DialogSpec::new(Rect::new(5, 10, 6, 20)), Rc::new(DefaultCallback));
    wm.init_dialog(d);
    wm.process_event(d, InputEvent::Mouse(down(2, 2)));
    assert_eq!(wm.phase(d), Phase::Active);

    let mut wm = manager_with(WmConfig::default().with_mouse_close_dialog(true));
    let full = wm.create_dialog(
        DialogSpec::new(Rect::default()).pos_flags(PosFlags::FULLSCREEN),
        Rc::new(DefaultCallback),
    );
    wm.init_dialog(full);
    wm.process_event(full, InputEvent::Mouse(down(200, 200)));
    assert_eq!(wm.phase(full), Phase::Active);
}
