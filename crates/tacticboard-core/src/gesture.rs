//! Pointer gesture interpretation.
//!
//! A gesture is one `Begin → Move* → End` sequence. Events must arrive in that
//! order; the interpreter does not reorder or validate them. A gesture that
//! begins on a token drags that token and never draws. Otherwise, when a draw
//! mode is active, it draws one straight line that is committed through
//! [`History`] when the pointer is released.

use crate::diagram::{Diagram, DiagramError, LineAnnotation, LineId, TOKEN_HIT_RADIUS, TokenId};
use crate::history::History;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Which kind of line a draw gesture produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    /// Drawing disabled; gestures only drag tokens.
    #[default]
    None,
    /// Solid line: a pass.
    Pass,
    /// Dashed line: a player run.
    Move,
}

impl DrawMode {
    /// Check if this mode draws lines at all.
    pub fn draws(self) -> bool {
        self != DrawMode::None
    }

    /// Whether lines drawn in this mode are dashed.
    pub fn dashed(self) -> bool {
        self == DrawMode::Move
    }
}

/// What to do with a line whose start and end coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DegenerateLinePolicy {
    /// Commit zero-length lines like any other.
    #[default]
    Commit,
    /// Drop zero-length lines on release.
    Discard,
}

/// Host-selected state that shapes how a gesture is interpreted.
#[derive(Debug, Clone, Copy)]
pub struct GestureContext {
    pub mode: DrawMode,
    /// Color applied to newly drawn lines.
    pub color: Color,
    /// Radius around a token's position that starts a drag.
    pub hit_radius: f64,
    pub degenerate_lines: DegenerateLinePolicy,
}

impl Default for GestureContext {
    fn default() -> Self {
        Self {
            mode: DrawMode::default(),
            color: Color::BLACK,
            hit_radius: TOKEN_HIT_RADIUS,
            degenerate_lines: DegenerateLinePolicy::default(),
        }
    }
}

impl GestureContext {
    pub fn with_mode(mut self, mode: DrawMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A single pointer event within a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Begin(Point),
    Move(Point),
    End(Point),
}

/// State of the gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The gesture started on a token and moves it.
    DraggingToken { id: TokenId },
    /// A line is being drawn but is not part of the diagram yet.
    DrawingLine { provisional: LineAnnotation },
    /// The gesture does nothing until it ends (no draw mode, or aborted).
    Inert,
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Nothing,
    TokenGrabbed(TokenId),
    TokenMoved(TokenId),
    LineStarted,
    LineUpdated,
    LineCommitted(LineId),
    LineDiscarded,
}

/// Turns pointer events into token drags and committed lines.
///
/// Holds at most one provisional line. All diagram mutation goes through
/// [`Diagram`] operations and [`History::commit`].
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    state: GestureState,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// The in-progress line, for rendering.
    pub fn provisional_line(&self) -> Option<&LineAnnotation> {
        match &self.state {
            GestureState::DrawingLine { provisional } => Some(provisional),
            _ => None,
        }
    }

    /// The token being dragged, if any.
    pub fn dragged_token(&self) -> Option<TokenId> {
        match self.state {
            GestureState::DraggingToken { id } => Some(id),
            _ => None,
        }
    }

    /// Handle one pointer event.
    ///
    /// Fails only when a dragged token has disappeared from the diagram; the
    /// gesture is dropped in that case.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        ctx: &GestureContext,
        diagram: &mut Diagram,
        history: &mut History,
    ) -> Result<GestureOutcome, DiagramError> {
        match event {
            PointerEvent::Begin(at) => Ok(self.begin(at, ctx, diagram)),
            PointerEvent::Move(to) => self.update(to, ctx, diagram),
            PointerEvent::End(at) => self.end(at, ctx, diagram, history),
        }
    }

    /// Start a gesture, hit-testing tokens at `at`.
    pub fn begin(&mut self, at: Point, ctx: &GestureContext, diagram: &Diagram) -> GestureOutcome {
        let hit = diagram.token_at(at, ctx.hit_radius);
        self.begin_with_hit(at, hit, ctx)
    }

    /// Start a gesture when the host has already hit-tested the begin point.
    pub fn begin_with_hit(
        &mut self,
        at: Point,
        hit: Option<TokenId>,
        ctx: &GestureContext,
    ) -> GestureOutcome {
        if self.is_active() {
            log::debug!("New gesture began before the previous one ended; dropping it");
            self.cancel();
        }

        if let Some(id) = hit {
            log::debug!("Dragging token {}", id);
            self.state = GestureState::DraggingToken { id };
            return GestureOutcome::TokenGrabbed(id);
        }

        if ctx.mode.draws() {
            self.state = GestureState::DrawingLine {
                provisional: LineAnnotation::new(at, at, ctx.color, ctx.mode.dashed()),
            };
            GestureOutcome::LineStarted
        } else {
            self.state = GestureState::Inert;
            GestureOutcome::Nothing
        }
    }

    /// Continue the gesture to `to`.
    pub fn update(
        &mut self,
        to: Point,
        ctx: &GestureContext,
        diagram: &mut Diagram,
    ) -> Result<GestureOutcome, DiagramError> {
        match &mut self.state {
            GestureState::Idle | GestureState::Inert => Ok(GestureOutcome::Nothing),
            GestureState::DraggingToken { id } => {
                let id = *id;
                if let Err(e) = diagram.move_token(id, to) {
                    self.state = GestureState::Idle;
                    return Err(e);
                }
                Ok(GestureOutcome::TokenMoved(id))
            }
            GestureState::DrawingLine { provisional } => {
                if !ctx.mode.draws() {
                    self.state = GestureState::Inert;
                    return Ok(GestureOutcome::LineDiscarded);
                }
                provisional.end = to;
                Ok(GestureOutcome::LineUpdated)
            }
        }
    }

    /// Finish the gesture at `at`, committing a drawn line.
    pub fn end(
        &mut self,
        at: Point,
        ctx: &GestureContext,
        diagram: &mut Diagram,
        history: &mut History,
    ) -> Result<GestureOutcome, DiagramError> {
        match std::mem::take(&mut self.state) {
            GestureState::Idle | GestureState::Inert => Ok(GestureOutcome::Nothing),
            GestureState::DraggingToken { id } => {
                diagram.move_token(id, at)?;
                Ok(GestureOutcome::TokenMoved(id))
            }
            GestureState::DrawingLine { mut provisional } => {
                if !ctx.mode.draws() {
                    return Ok(GestureOutcome::LineDiscarded);
                }
                provisional.end = at;
                if provisional.is_degenerate()
                    && ctx.degenerate_lines == DegenerateLinePolicy::Discard
                {
                    log::debug!("Discarding zero-length line");
                    return Ok(GestureOutcome::LineDiscarded);
                }
                let id = provisional.id();
                history.commit(diagram, provisional);
                Ok(GestureOutcome::LineCommitted(id))
            }
        }
    }

    /// Abandon the current gesture without committing anything.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        interpreter: &mut GestureInterpreter,
        ctx: &GestureContext,
        diagram: &mut Diagram,
        history: &mut History,
        events: &[PointerEvent],
    ) -> Vec<GestureOutcome> {
        events
            .iter()
            .map(|&e| interpreter.handle(e, ctx, diagram, history).unwrap())
            .collect()
    }

    #[test]
    fn test_draw_pass_line() {
        let mut diagram = Diagram::new();
        let mut history = History::new();
        let mut gi = GestureInterpreter::new();
        let red = Color::new([1.0, 0.0, 0.0, 1.0]);
        let ctx = GestureContext::default().with_mode(DrawMode::Pass).with_color(red);

        gi.handle(PointerEvent::Begin(Point::new(10.0, 10.0)), &ctx, &mut diagram, &mut history)
            .unwrap();
        gi.handle(PointerEvent::Move(Point::new(40.0, 20.0)), &ctx, &mut diagram, &mut history)
            .unwrap();

        let preview = gi.provisional_line().unwrap();
        assert_eq!(preview.start, Point::new(10.0, 10.0));
        assert_eq!(preview.end, Point::new(40.0, 20.0));
        assert!(diagram.lines().is_empty());

        let outcome = gi
            .handle(PointerEvent::End(Point::new(50.0, 25.0)), &ctx, &mut diagram, &mut history)
            .unwrap();
        assert!(matches!(outcome, GestureOutcome::LineCommitted(_)));
        assert!(gi.provisional_line().is_none());

        let line = &diagram.lines()[0];
        assert_eq!(line.end, Point::new(50.0, 25.0));
        assert_eq!(line.color, red);
        assert!(!line.dashed);
        assert!(history.can_undo());
    }

    #[test]
    fn test_move_mode_draws_dashed() {
        let mut diagram = Diagram::new();
        let mut history = History::new();
        let mut gi = GestureInterpreter::new();
        let ctx = GestureContext::default().with_mode(DrawMode::Move);

        run(
            &mut gi,
            &ctx,
            &mut diagram,
            &mut history,
            &[
                PointerEvent::Begin(Point::new(0.0, 0.0)),
                PointerEvent::End(Point::new(30.0, 0.0)),
            ],
        );
        assert!(diagram.lines()[0].dashed);
    }

    #[test]
    fn test_drag_token_suppresses_drawing() {
        let mut diagram = Diagram::new();
        let mut history = History::new();
        let mut gi = GestureInterpreter::new();
        let id = diagram.add_token("A1", Color::BLACK, Point::new(100.0, 100.0));
        let ctx = GestureContext::default().with_mode(DrawMode::Pass);

        let outcomes = run(
            &mut gi,
            &ctx,
            &mut diagram,
            &mut history,
            &[
                PointerEvent::Begin(Point::new(105.0, 98.0)),
                PointerEvent::Move(Point::new(150.0, 120.0)),
                PointerEvent::End(Point::new(200.0, 160.0)),
            ],
        );

        assert_eq!(outcomes[0], GestureOutcome::TokenGrabbed(id));
        assert_eq!(outcomes[1], GestureOutcome::TokenMoved(id));
        assert!(diagram.lines().is_empty());
        assert!(!history.can_undo());
        assert_eq!(diagram.token(id).unwrap().position, Point::new(200.0, 160.0));
    }

    #[test]
    fn test_no_draw_mode_is_inert() {
        let mut diagram = Diagram::new();
        let mut history = History::new();
        let mut gi = GestureInterpreter::new();
        let ctx = GestureContext::default();

        let outcomes = run(
            &mut gi,
            &ctx,
            &mut diagram,
            &mut history,
            &[
                PointerEvent::Begin(Point::new(0.0, 0.0)),
                PointerEvent::Move(Point::new(10.0, 0.0)),
                PointerEvent::End(Point::new(20.0, 0.0)),
            ],
        );

        assert!(outcomes.iter().all(|o| *o == GestureOutcome::Nothing));
        assert!(diagram.is_empty());
        assert!(!gi.is_active());
    }

    #[test]
    fn test_mode_switched_off_mid_gesture_discards() {
        let mut diagram = Diagram::new();
        let mut history = History::new();
        let mut gi = GestureInterpreter::new();
        let drawing = GestureContext::default().with_mode(DrawMode::Pass);
        let off = drawing.with_mode(DrawMode::None);

        gi.handle(PointerEvent::Begin(Point::ZERO), &drawing, &mut diagram, &mut history)
            .unwrap();
        let outcome = gi
            .handle(PointerEvent::Move(Point::new(5.0, 5.0)), &off, &mut diagram, &mut history)
            .unwrap();
        assert_eq!(outcome, GestureOutcome::LineDiscarded);
        assert!(gi.provisional_line().is_none());

        // Switching back on does not resurrect the line.
        let outcome = gi
            .handle(PointerEvent::End(Point::new(9.0, 9.0)), &drawing, &mut diagram, &mut history)
            .unwrap();
        assert_eq!(outcome, GestureOutcome::Nothing);
        assert!(diagram.lines().is_empty());
    }

    #[test]
    fn test_degenerate_line_policy() {
        let mut diagram = Diagram::new();
        let mut history = History::new();
        let mut gi = GestureInterpreter::new();
        let p = Point::new(40.0, 40.0);
        let permissive = GestureContext::default().with_mode(DrawMode::Pass);
        let strict = GestureContext {
            degenerate_lines: DegenerateLinePolicy::Discard,
            ..permissive
        };

        run(
            &mut gi,
            &permissive,
            &mut diagram,
            &mut history,
            &[PointerEvent::Begin(p), PointerEvent::End(p)],
        );
        assert_eq!(diagram.lines().len(), 1);
        assert!(diagram.lines()[0].is_degenerate());

        let outcomes = run(
            &mut gi,
            &strict,
            &mut diagram,
            &mut history,
            &[PointerEvent::Begin(p), PointerEvent::End(p)],
        );
        assert_eq!(outcomes[1], GestureOutcome::LineDiscarded);
        assert_eq!(diagram.lines().len(), 1);
    }

    #[test]
    fn test_drag_of_vanished_token_fails() {
        let mut diagram = Diagram::new();
        let mut history = History::new();
        let mut gi = GestureInterpreter::new();
        let id = diagram.add_token("A1", Color::BLACK, Point::ZERO);
        let ctx = GestureContext::default();

        gi.handle(PointerEvent::Begin(Point::ZERO), &ctx, &mut diagram, &mut history)
            .unwrap();
        diagram.reset();

        let result = gi.handle(PointerEvent::Move(Point::new(1.0, 1.0)), &ctx, &mut diagram, &mut history);
        assert_eq!(result, Err(DiagramError::TokenNotFound(id)));
        assert!(!gi.is_active());
    }

    #[test]
    fn test_out_of_band_hit() {
        let mut diagram = Diagram::new();
        let mut history = History::new();
        let mut gi = GestureInterpreter::new();
        let id = diagram.add_token("B1", Color::BLACK, Point::new(300.0, 300.0));
        let ctx = GestureContext::default().with_mode(DrawMode::Move);

        // The host reports a hit even though the point is far from the token.
        let outcome = gi.begin_with_hit(Point::ZERO, Some(id), &ctx);
        assert_eq!(outcome, GestureOutcome::TokenGrabbed(id));
        gi.end(Point::new(1.0, 2.0), &ctx, &mut diagram, &mut history)
            .unwrap();

        assert_eq!(diagram.token(id).unwrap().position, Point::new(1.0, 2.0));
        assert!(diagram.lines().is_empty());
    }

    #[test]
    fn test_cancel_discards_provisional_line() {
        let diagram = Diagram::new();
        let mut gi = GestureInterpreter::new();
        let ctx = GestureContext::default().with_mode(DrawMode::Pass);

        gi.begin(Point::ZERO, &ctx, &diagram);
        assert!(gi.provisional_line().is_some());
        gi.cancel();
        assert!(gi.provisional_line().is_none());
        assert!(!gi.is_active());
    }
}
