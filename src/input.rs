use crate::geometry::Point;
use egui::{Context, Event, Key, Modifiers, PointerButton, Pos2, Rect};

/// Presses closer together than this (in seconds) count as one multi-click
const MULTI_CLICK_INTERVAL: f64 = 0.35;
/// ...as long as the pointer moved less than this many image pixels
const MULTI_CLICK_SLOP: i32 = 4;

/// A pointer event already mapped into image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    /// 1 for a single click, 2 for a double click, and so on
    pub click_count: u32,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(position: Point, click_count: u32, modifiers: Modifiers) -> Self {
        Self {
            position,
            click_count,
            modifiers,
        }
    }

    /// Plain single click or move at (x, y)
    pub fn at(x: i32, y: i32) -> Self {
        Self::new(Point::new(x, y), 1, Modifiers::NONE)
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_clicks(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }

    pub fn is_shift_down(&self) -> bool {
        self.modifiers.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Input a tool reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolInput {
    /// Pointer moved with no button held
    PointerMove(PointerEvent),
    /// Pointer moved while the primary button is held
    PointerDrag(PointerEvent),
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    KeyDown(KeyEvent),
}

/// Converts raw egui input into [`ToolInput`] events in image coordinates
#[derive(Debug, Clone)]
pub struct InputHandler {
    canvas_rect: Rect,
    image_size: (u32, u32),
    button_down: bool,
    last_press: Option<(f64, Point)>,
    click_count: u32,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect, image_size: (u32, u32)) -> Self {
        Self {
            canvas_rect,
            image_size,
            button_down: false,
            last_press: None,
            click_count: 0,
        }
    }

    /// Update the on-screen canvas rectangle (e.g. if the window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    /// Map a screen position onto image pixels
    pub fn to_image(&self, pos: Pos2) -> Point {
        let rect = self.canvas_rect;
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Point::from(pos - rect.min.to_vec2());
        }
        let sx = self.image_size.0 as f32 / rect.width();
        let sy = self.image_size.1 as f32 / rect.height();
        Point::from(Pos2::new((pos.x - rect.min.x) * sx, (pos.y - rect.min.y) * sy))
    }

    fn next_click_count(&mut self, time: f64, at: Point) -> u32 {
        let repeated = match self.last_press {
            Some((last_time, last_at)) => {
                time - last_time <= MULTI_CLICK_INTERVAL
                    && (last_at.x - at.x).abs() <= MULTI_CLICK_SLOP
                    && (last_at.y - at.y).abs() <= MULTI_CLICK_SLOP
            }
            None => false,
        };
        self.click_count = if repeated { self.click_count + 1 } else { 1 };
        self.last_press = Some((time, at));
        self.click_count
    }

    /// Translate one raw egui event, if it is relevant to the tools
    pub fn translate(
        &mut self,
        event: &Event,
        time: f64,
        modifiers: Modifiers,
    ) -> Option<ToolInput> {
        match event {
            Event::PointerMoved(pos) => {
                if !self.canvas_rect.contains(*pos) && !self.button_down {
                    return None;
                }
                let clicks = self.click_count.max(1);
                let pointer = PointerEvent::new(self.to_image(*pos), clicks, modifiers);
                Some(if self.button_down {
                    ToolInput::PointerDrag(pointer)
                } else {
                    ToolInput::PointerMove(pointer)
                })
            }
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers,
                ..
            } => {
                let at = self.to_image(*pos);
                if *pressed {
                    if !self.canvas_rect.contains(*pos) {
                        return None;
                    }
                    self.button_down = true;
                    let clicks = self.next_click_count(time, at);
                    Some(ToolInput::PointerDown(PointerEvent::new(at, clicks, *modifiers)))
                } else if self.button_down {
                    self.button_down = false;
                    let clicks = self.click_count.max(1);
                    Some(ToolInput::PointerUp(PointerEvent::new(at, clicks, *modifiers)))
                } else {
                    None
                }
            }
            Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => Some(ToolInput::KeyDown(KeyEvent {
                key: *key,
                modifiers: *modifiers,
            })),
            _ => None,
        }
    }

    /// Process this frame's raw egui input and generate tool events
    pub fn process_input(&mut self, ctx: &Context) -> Vec<ToolInput> {
        let (events, time, modifiers) = ctx.input(|i| (i.events.clone(), i.time, i.modifiers));
        events
            .iter()
            .filter_map(|event| self.translate(event, time, modifiers))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn handler() -> InputHandler {
        let rect = Rect::from_min_size(pos2(100.0, 50.0), egui::vec2(200.0, 100.0));
        InputHandler::new(rect, (100, 50))
    }

    fn press(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_maps_into_image_space() {
        let h = handler();
        assert_eq!(h.to_image(pos2(100.0, 50.0)), Point::new(0, 0));
        assert_eq!(h.to_image(pos2(300.0, 150.0)), Point::new(100, 50));
        assert_eq!(h.to_image(pos2(120.0, 70.0)), Point::new(10, 10));
    }

    #[test]
    fn test_move_then_drag() {
        let mut h = handler();
        let moved = h.translate(&Event::PointerMoved(pos2(120.0, 70.0)), 0.0, Modifiers::NONE);
        assert!(matches!(moved, Some(ToolInput::PointerMove(_))));

        h.translate(&press(pos2(120.0, 70.0), true), 0.0, Modifiers::NONE);
        let dragged = h.translate(&Event::PointerMoved(pos2(130.0, 70.0)), 0.1, Modifiers::NONE);
        assert!(matches!(dragged, Some(ToolInput::PointerDrag(_))));

        let up = h.translate(&press(pos2(130.0, 70.0), false), 0.2, Modifiers::NONE);
        assert!(matches!(up, Some(ToolInput::PointerUp(_))));
    }

    #[test]
    fn test_double_click_counted() {
        let mut h = handler();
        let first = h.translate(&press(pos2(120.0, 70.0), true), 1.0, Modifiers::NONE);
        h.translate(&press(pos2(120.0, 70.0), false), 1.05, Modifiers::NONE);
        let second = h.translate(&press(pos2(121.0, 70.0), true), 1.2, Modifiers::NONE);

        match (first, second) {
            (Some(ToolInput::PointerDown(a)), Some(ToolInput::PointerDown(b))) => {
                assert_eq!(a.click_count, 1);
                assert_eq!(b.click_count, 2);
            }
            other => panic!("unexpected events: {other:?}"),
        }

        let late = h.translate(&press(pos2(121.0, 70.0), true), 5.0, Modifiers::NONE);
        assert!(matches!(late, Some(ToolInput::PointerDown(p)) if p.click_count == 1));
    }

    #[test]
    fn test_press_outside_canvas_ignored() {
        let mut h = handler();
        assert!(h.translate(&press(pos2(10.0, 10.0), true), 0.0, Modifiers::NONE).is_none());
    }
}
