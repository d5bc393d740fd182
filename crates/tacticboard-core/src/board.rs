//! The tactics board: diagram, history and input handling in one place.
//!
//! This is the surface a host talks to. It forwards pointer input to the
//! gesture interpreter, palette drops to the spawner, and exposes read-only
//! snapshots for rendering.

use crate::codec::{DecodeError, EncodeError};
use crate::config::BoardConfig;
use crate::diagram::{Diagram, DiagramError, LineAnnotation, TokenId};
use crate::gesture::{DrawMode, GestureContext, GestureInterpreter, GestureOutcome, PointerEvent};
use crate::history::{History, HistoryError};
use crate::palette;
use crate::persistence;
use kurbo::Point;
use peniko::Color;

/// Runtime board state. Only the diagram is persisted.
#[derive(Debug, Clone)]
pub struct Board {
    diagram: Diagram,
    history: History,
    gestures: GestureInterpreter,
    context: GestureContext,
    config: BoardConfig,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a board with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        let context = GestureContext {
            mode: DrawMode::None,
            color: config.line_color(),
            hit_radius: config.hit_radius,
            degenerate_lines: config.degenerate_lines,
        };
        Self {
            diagram: Self::starting_diagram(&config),
            history: History::new(),
            gestures: GestureInterpreter::new(),
            context,
            config,
        }
    }

    fn starting_diagram(config: &BoardConfig) -> Diagram {
        if config.starting_formation {
            Diagram::with_default_formation()
        } else {
            Diagram::new()
        }
    }

    /// Current diagram, for rendering.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// The line being drawn right now, if any.
    pub fn provisional_line(&self) -> Option<&LineAnnotation> {
        self.gestures.provisional_line()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.context.mode
    }

    /// Select the draw mode. Turning drawing off drops any line in progress.
    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        if !mode.draws() && self.gestures.provisional_line().is_some() {
            log::debug!("Draw mode switched off mid-gesture; discarding line");
            self.gestures.cancel();
        }
        self.context.mode = mode;
    }

    pub fn line_color(&self) -> Color {
        self.context.color
    }

    /// Set the color for lines drawn from now on.
    pub fn set_line_color(&mut self, color: Color) {
        self.context.color = color;
    }

    /// Feed one pointer event.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<GestureOutcome, DiagramError> {
        self.gestures
            .handle(event, &self.context, &mut self.diagram, &mut self.history)
    }

    /// Handle a drop from the palette. Unknown payloads are ignored.
    pub fn drop_payload(&mut self, payload: &str, at: Point) -> Option<TokenId> {
        match palette::drop_payload(&mut self.diagram, payload, at) {
            Ok(id) => Some(id),
            Err(e) => {
                log::debug!("Ignoring drop: {}", e);
                None
            }
        }
    }

    pub fn set_token_color(&mut self, id: TokenId, color: Color) -> Result<(), DiagramError> {
        self.diagram.set_token_color(id, color)
    }

    pub fn undo(&mut self) -> Result<LineAnnotation, HistoryError> {
        self.history.undo(&mut self.diagram)
    }

    pub fn redo(&mut self) -> Result<LineAnnotation, HistoryError> {
        self.history.redo(&mut self.diagram)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Clear tokens, lines and history together.
    ///
    /// With [`BoardConfig::starting_formation`] enabled the board is re-seeded
    /// with the default formation rather than left empty.
    pub fn reset(&mut self) {
        log::info!("Resetting board");
        self.gestures.cancel();
        self.history.clear();
        self.diagram = Self::starting_diagram(&self.config);
    }

    /// Serialize the diagram. History is not included.
    ///
    /// Fails if any coordinate or color channel is not finite; nothing is
    /// written in that case.
    pub fn save(&self) -> Result<Vec<u8>, EncodeError> {
        persistence::save(&self.diagram)
    }

    /// Replace the diagram with a saved one.
    ///
    /// History always starts empty afterwards. On failure the board is left
    /// empty and the decode error is returned.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        self.gestures.cancel();
        self.history.clear();
        let (diagram, error) = persistence::load_or_empty(bytes);
        self.diagram = diagram;
        match error {
            Some(e) => Err(e),
            None => {
                log::info!(
                    "Loaded board with {} tokens and {} lines",
                    self.diagram.tokens().len(),
                    self.diagram.lines().len()
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new();
        assert!(board.diagram().is_empty());
        assert_eq!(board.draw_mode(), DrawMode::None);
        assert!(!board.can_undo());
        assert!(!board.can_redo());
    }

    #[test]
    fn test_starting_formation() {
        let config = BoardConfig {
            starting_formation: true,
            ..BoardConfig::default()
        };
        let mut board = Board::with_config(config);
        assert_eq!(board.diagram().tokens().len(), 8);

        board.drop_payload("A", Point::new(1.0, 1.0));
        board.reset();
        assert_eq!(board.diagram().tokens().len(), 8);
    }

    #[test]
    fn test_switching_mode_off_drops_provisional() {
        let mut board = Board::new();
        board.set_draw_mode(DrawMode::Pass);
        board.pointer(PointerEvent::Begin(Point::ZERO)).unwrap();
        assert!(board.provisional_line().is_some());

        board.set_draw_mode(DrawMode::None);
        assert!(board.provisional_line().is_none());

        board.pointer(PointerEvent::End(Point::new(10.0, 0.0))).unwrap();
        assert!(board.diagram().lines().is_empty());
    }

    #[test]
    fn test_line_color_applies_to_new_lines() {
        let mut board = Board::new();
        let green = Color::new([0.0, 1.0, 0.0, 1.0]);
        board.set_draw_mode(DrawMode::Move);
        board.set_line_color(green);

        board.pointer(PointerEvent::Begin(Point::ZERO)).unwrap();
        board.pointer(PointerEvent::End(Point::new(20.0, 0.0))).unwrap();

        let line = &board.diagram().lines()[0];
        assert_eq!(line.color, green);
        assert!(line.dashed);
    }

    #[test]
    fn test_unknown_drop_ignored() {
        let mut board = Board::new();
        assert_eq!(board.drop_payload("goalkeeper", Point::ZERO), None);
        assert!(board.diagram().is_empty());
    }

    #[test]
    fn test_save_refuses_nan_drag() {
        let mut board = Board::new();
        board.drop_payload("A", Point::new(50.0, 50.0));

        board.pointer(PointerEvent::Begin(Point::new(50.0, 50.0))).unwrap();
        board.pointer(PointerEvent::End(Point::new(f64::NAN, 60.0))).unwrap();

        assert!(matches!(board.save(), Err(EncodeError::NonFinite("x"))));
    }

    #[test]
    fn test_set_token_color() {
        let mut board = Board::new();
        let id = board.drop_payload("A", Point::ZERO).unwrap();
        board.set_token_color(id, Color::WHITE).unwrap();
        assert_eq!(board.diagram().token(id).unwrap().color, Color::WHITE);
    }
}
