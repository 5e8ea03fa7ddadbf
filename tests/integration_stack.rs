use std::cell::RefCell;
use std::rc::Rc;

use term_dlg::commands::{Command, ResultCode};
use term_dlg::drivers::headless::{HeadlessDriver, HeadlessHandle};
use term_dlg::geometry::{PosFlags, Rect};
use term_dlg::state::{Phase, StateFlags};
use term_dlg::window::{DefaultCallback, DialogSpec, WidgetCallback, WidgetHandle};
use term_dlg::{CbResult, Message, WindowManager, WmConfig};

type Log = Rc<RefCell<Vec<&'static str>>>;

struct DrawLog {
    name: &'static str,
    log: Log,
}

impl WidgetCallback for DrawLog {
    fn callback(
        &self,
        wm: &mut WindowManager,
        w: WidgetHandle,
        sender: Option<WidgetHandle>,
        msg: &Message,
    ) -> CbResult {
        if matches!(msg, Message::Draw) {
            self.log.borrow_mut().push(self.name);
        }
        wm.default_callback(w, sender, msg)
    }
}

fn manager_with(config: WmConfig) -> (WindowManager, HeadlessHandle) {
    let driver = HeadlessDriver::new(80, 24);
    let handle = driver.handle();
    let wm = WindowManager::new(Box::new(driver), config).unwrap();
    (wm, handle)
}

fn logged(wm: &mut WindowManager, log: &Log, name: &'static str, spec: DialogSpec) -> WidgetHandle {
    wm.create_dialog(
        spec,
        Rc::new(DrawLog {
            name,
            log: Rc::clone(log),
        }),
    )
}

#[test]
fn dialog_opened_over_a_modal_one_becomes_modal() {
    let (mut wm, _) = manager_with(WmConfig::default());
    let a = wm.create_dialog(
        DialogSpec::new(Rect::new(0, 0, 10, 40)).modal(true),
        Rc::new(DefaultCallback),
    );
    let b = wm.create_dialog(DialogSpec::new(Rect::new(2, 2, 5, 20)), Rc::new(DefaultCallback));
    assert!(!wm.has_state(b, StateFlags::MODAL));
    wm.init_dialog(a);
    wm.init_dialog(b);
    assert!(wm.has_state(b, StateFlags::MODAL));
    assert_eq!(wm.dialogs(), &[b, a]);
    assert!(wm.switch_dialogs().is_empty());
}

#[test]
fn refresh_starts_at_nearest_fullscreen_dialog() {
    let (mut wm, _) = manager_with(WmConfig::default());
    let log: Log = Rc::default();
    let other = logged(&mut wm, &log, "other", DialogSpec::new(Rect::new(1, 1, 5, 20)));
    let full = logged(
        &mut wm,
        &log,
        "full",
        DialogSpec::new(Rect::default()).pos_flags(PosFlags::FULLSCREEN),
    );
    let small = logged(&mut wm, &log, "small", DialogSpec::new(Rect::new(3, 3, 4, 10)));
    wm.init_dialog(other);
    wm.init_dialog(full);
    wm.init_dialog(small);
    assert_eq!(wm.dialogs(), &[small, full, other]);

    log.borrow_mut().clear();
    wm.do_refresh();
    assert_eq!(log.borrow().as_slice(), &["full", "small"]);
}

#[test]
fn refresh_without_fullscreen_starts_at_the_back() {
    let (mut wm, _) = manager_with(WmConfig::default());
    let log: Log = Rc::default();
    let back = logged(&mut wm, &log, "back", DialogSpec::new(Rect::new(1, 1, 5, 20)));
    let front = logged(&mut wm, &log, "front", DialogSpec::new(Rect::new(3, 3, 4, 10)));
    wm.init_dialog(back);
    wm.init_dialog(front);
    log.borrow_mut().clear();
    wm.do_refresh();
    assert_eq!(log.borrow().as_slice(), &["back", "front"]);
}

#[test]
fn fast_refresh_draws_only_the_top() {
    let (mut wm, _) = manager_with(WmConfig::default().with_fast_refresh(true));
    let log: Log = Rc::default();
    let back = logged(&mut wm, &log, "back", DialogSpec::new(Rect::new(1, 1, 5, 20)));
    let front = logged(&mut wm, &log, "front", DialogSpec::new(Rect::new(3, 3, 4, 10)));
    wm.init_dialog(back);
    wm.init_dialog(front);
    log.borrow_mut().clear();
    wm.do_refresh();
    assert_eq!(log.borrow().as_slice(), &["front"]);
}

#[test]
fn refresh_command_repaints_everything() {
    let (mut wm, input) = manager_with(WmConfig::default());
    let d = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    wm.init_dialog(d);
    wm.present().unwrap();
    wm.present().unwrap();
    assert_eq!(input.full_repaints(), 1);
    assert!(wm.execute_cmd(d, Command::Refresh).is_handled());
    wm.present().unwrap();
    assert_eq!(input.full_repaints(), 2);
    assert_eq!(input.frames(), 3);
}

#[test]
fn switch_list_tracks_non_modal_dialogs() {
    let (mut wm, _) = manager_with(WmConfig::default());
    let a = wm.create_dialog(
        DialogSpec::new(Rect::default()).pos_flags(PosFlags::FULLSCREEN),
        Rc::new(DefaultCallback),
    );
    let b = wm.create_dialog(
        DialogSpec::new(Rect::default()).pos_flags(PosFlags::FULLSCREEN),
        Rc::new(DefaultCallback),
    );
    wm.init_dialog(a);
    wm.init_dialog(b);
    assert_eq!(wm.switch_dialogs(), &[b, a]);
    assert_eq!(wm.switch_current(), Some(b));
    assert_eq!(wm.phase(a), Phase::Suspended);
    assert_eq!(wm.phase(b), Phase::Active);

    assert!(wm.execute_cmd(b, Command::ScreenNext).is_handled());
    assert!(wm.is_switch_pending());
    assert_eq!(wm.switch_current(), Some(a));
    assert_eq!(wm.phase(b), Phase::Suspended);

    // `a` runs until the headless input runs dry, which cancels it.
    assert_eq!(wm.process_switch_pending().unwrap(), Some(ResultCode::Cancel));
    assert!(!wm.contains(a));
    assert_eq!(wm.switch_dialogs(), &[b]);
    assert_eq!(wm.switch_current(), Some(b));
    assert_eq!(wm.phase(b), Phase::Active);
    assert!(!wm.is_switch_pending());
}

#[test]
fn screen_list_uses_the_installed_picker() {
    let (mut wm, _) = manager_with(WmConfig::default());
    let a = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    let b = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    wm.init_dialog(a);
    wm.init_dialog(b);

    // No picker: nothing happens.
    wm.execute_cmd(b, Command::ScreenList);
    assert!(!wm.is_switch_pending());

    wm.set_screen_picker(Some(Rc::new(|_wm: &mut WindowManager, list: &[WidgetHandle]| {
        list.last().copied()
    })));
    wm.execute_cmd(b, Command::ScreenList);
    assert!(wm.is_switch_pending());
    assert_eq!(wm.switch_current(), Some(a));
}

#[test]
fn screen_prev_wraps_around() {
    let (mut wm, _) = manager_with(WmConfig::default());
    let a = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    let b = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    let c = wm.create_dialog(DialogSpec::new(Rect::new(0, 0, 10, 40)), Rc::new(DefaultCallback));
    wm.init_dialog(a);
    wm.init_dialog(b);
    wm.init_dialog(c);
    assert_eq!(wm.switch_dialogs(), &[c, b, a]);
    wm.execute_cmd(c, Command::ScreenPrev);
    assert_eq!(wm.switch_current(), Some(a));
}

#[test]
fn resize_during_run_replaces_the_dialog() {
    let (mut wm, input) = manager_with(WmConfig::default());
    let d = wm.create_dialog(
        DialogSpec::new(Rect::new(0, 0, 10, 40)).pos_flags(PosFlags::CENTER),
        Rc::new(DefaultCallback),
    );
    assert_eq!(wm.widget(d).rect(), Rect::new(7, 20, 10, 40));
    input.push_resize(100, 40);
    assert_eq!(wm.run(d).unwrap(), ResultCode::Cancel);
    assert_eq!(wm.screen_size(), (40, 100));
    assert_eq!(wm.widget(d).rect(), Rect::new(15, 30, 10, 40));
    assert_eq!(input.last_frame().area.width, 100);
}

#[test]
fn suspended_screen_is_resized_when_resumed() {
    let (mut wm, _) = manager_with(WmConfig::default());
    let a = wm.create_dialog(
        DialogSpec::new(Rect::default()).pos_flags(PosFlags::FULLSCREEN),
        Rc::new(DefaultCallback),
    );
    let b = wm.create_dialog(
        DialogSpec::new(Rect::default()).pos_flags(PosFlags::FULLSCREEN),
        Rc::new(DefaultCallback),
    );
    wm.init_dialog(a);
    wm.run_done(a);
    wm.init_dialog(b);
    assert_eq!(wm.dialogs(), &[b]);

    wm.change_screen_size(90, 30);
    assert_eq!(wm.widget(b).rect(), Rect::new(0, 0, 30, 90));
    assert_eq!(wm.widget(a).rect(), Rect::new(0, 0, 24, 80));

    wm.execute_cmd(b, Command::ScreenNext);
    wm.process_switch_pending().unwrap();
    assert!(!wm.contains(a));
}

#[test]
fn destroying_the_top_dialog_redraws_the_rest() {
    let (mut wm, _) = manager_with(WmConfig::default());
    let log: Log = Rc::default();
    let back = logged(
        &mut wm,
        &log,
        "back",
        DialogSpec::new(Rect::default()).pos_flags(PosFlags::FULLSCREEN),
    );
    let top = logged(
        &mut wm,
        &log,
        "top",
        DialogSpec::new(Rect::new(2, 2, 5, 20)).modal(true),
    );
    wm.init_dialog(back);
    wm.init_dialog(top);
    wm.stop(top);
    wm.run_done(top);
    log.borrow_mut().clear();
    wm.destroy_dialog(top);
    assert_eq!(log.borrow().as_slice(), &["back"]);
    assert_eq!(wm.dialogs(), &[back]);
}
