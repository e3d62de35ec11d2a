//! Menu screens as plain data: which screen, which option, what it does.

use crate::{
    defs::Buttons,
    renderer::{Renderer, Rgba, rgb},
    sim::InputFrame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Main,
    Pause,
    GameLose,
    GameWon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartGame,
    Resume,
    Restart,
    Quit,
}

impl MenuKind {
    pub fn options(self) -> &'static [MenuAction] {
        use MenuAction::*;
        match self {
            MenuKind::Main => &[StartGame, Quit],
            MenuKind::Pause => &[Resume, Restart, Quit],
            MenuKind::GameLose | MenuKind::GameWon => &[Restart, Quit],
        }
    }

    fn backdrop(self) -> Rgba {
        match self {
            MenuKind::Main => rgb(24, 24, 48),
            MenuKind::Pause => rgb(32, 32, 32),
            MenuKind::GameLose => rgb(64, 12, 12),
            MenuKind::GameWon => rgb(12, 56, 20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    kind: MenuKind,
    selected: usize,
}

impl Menu {
    pub fn new(kind: MenuKind) -> Self {
        Self { kind, selected: 0 }
    }

    #[inline]
    pub fn kind(&self) -> MenuKind {
        self.kind
    }

    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Switch screens; the cursor goes back to the first option.
    pub fn set(&mut self, kind: MenuKind) {
        self.kind = kind;
        self.selected = 0;
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.kind.options().len() {
            self.selected += 1;
        }
    }

    pub fn current(&self) -> MenuAction {
        self.kind.options()[self.selected]
    }

    /// Navigate with this frame's presses. Returns the chosen action, if any.
    pub fn handle_events(&mut self, input: &InputFrame) -> Option<MenuAction> {
        if input.pressed(Buttons::MENU_UP) {
            self.move_up();
        }
        if input.pressed(Buttons::MENU_DOWN) {
            self.move_down();
        }
        if input.pressed(Buttons::MENU) && self.kind == MenuKind::Pause {
            return Some(MenuAction::Resume);
        }
        input.pressed(Buttons::CONFIRM).then(|| self.current())
    }

    /// Backdrop plus one bar per option; the selected bar is brighter.
    pub fn render<R: Renderer>(&self, r: &mut R, w: usize, h: usize) {
        let (w, h) = (w as i32, h as i32);
        r.fill_rect(0, 0, w, h, self.kind.backdrop());

        let options = self.kind.options();
        let bar_w = w / 2;
        let bar_h = (h / 12).max(4);
        let gap = bar_h / 2;
        let total = options.len() as i32 * (bar_h + gap) - gap;
        let x = (w - bar_w) / 2;
        let mut y = (h - total) / 2;

        for (i, action) in options.iter().enumerate() {
            let color = if i == self.selected {
                rgb(230, 200, 60)
            } else {
                bar_color(*action)
            };
            r.fill_rect(x, y, bar_w, bar_h, color);
            y += bar_h + gap;
        }
    }
}

fn bar_color(action: MenuAction) -> Rgba {
    match action {
        MenuAction::StartGame | MenuAction::Resume => rgb(70, 110, 70),
        MenuAction::Restart => rgb(70, 90, 130),
        MenuAction::Quit => rgb(120, 60, 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Renderer, software::Software};

    fn press(b: Buttons) -> InputFrame {
        InputFrame {
            pressed: b,
            ..InputFrame::default()
        }
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut m = Menu::new(MenuKind::Pause);
        m.move_up();
        assert_eq!(m.selected(), 0);
        for _ in 0..5 {
            m.move_down();
        }
        assert_eq!(m.current(), MenuAction::Quit);
        m.set(MenuKind::GameWon);
        assert_eq!(m.current(), MenuAction::Restart);
    }

    #[test]
    fn confirm_and_escape() {
        let mut m = Menu::new(MenuKind::Main);
        assert_eq!(m.handle_events(&press(Buttons::CONFIRM)), Some(MenuAction::StartGame));
        assert_eq!(m.handle_events(&press(Buttons::MENU)), None);
        assert_eq!(m.handle_events(&press(Buttons::MENU_DOWN | Buttons::CONFIRM)), Some(MenuAction::Quit));

        m.set(MenuKind::Pause);
        assert_eq!(m.handle_events(&press(Buttons::MENU)), Some(MenuAction::Resume));
    }

    #[test]
    fn selected_bar_is_highlighted() {
        let mut sw = Software::new();
        sw.begin_frame(80, 60);
        let m = Menu::new(MenuKind::GameLose);
        m.render(&mut sw, 80, 60);
        assert_eq!(sw.pixel(0, 0), MenuKind::GameLose.backdrop());
        // two bars of 5 rows with a 2 row gap, centred: first bar starts at row 24
        assert_eq!(sw.pixel(40, 26), rgb(230, 200, 60));
        assert_eq!(sw.pixel(40, 33), bar_color(MenuAction::Quit));
    }
}
