//! Text line presentation state machine

/// Whether a line is currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LineState {
    #[default]
    Hidden,
    Showing,
}

/// Edge produced by [`TextLine::set_should_show`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTransition {
    /// Hidden to Showing; the enter animation restarted with this generation
    Entered { generation: u64 },
    /// Showing to Hidden; the animation was cleared
    Exited,
}

/// What a renderer needs to draw one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinePresentation {
    pub visible: bool,
    /// Enter animation is applied
    pub animating: bool,
    /// Receives pointer events
    pub interactive: bool,
    /// Hidden from assistive technology
    pub aria_hidden: bool,
    /// Bumped on every restart so a renderer can tell two entries apart
    pub animation_generation: u64,
}

/// One overlaid text line.
///
/// The enter animation is edge-triggered: it restarts on every
/// Hidden -> Showing transition, including when the same line becomes
/// active twice without being torn down, and never on a repeated `true`.
#[derive(Debug, Clone)]
pub struct TextLine {
    text: String,
    state: LineState,
    animating: bool,
    generation: u64,
}

impl TextLine {
    /// Creates a hidden line
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            state: LineState::Hidden,
            animating: false,
            generation: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    /// Number of times the enter animation has started
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drives the state machine with the latest show/hide level
    pub fn set_should_show(&mut self, should_show: bool) -> Option<LineTransition> {
        match (self.state, should_show) {
            (LineState::Hidden, true) => {
                // A new generation is what restarts the animation for a
                // renderer that already drew the previous one.
                self.generation += 1;
                self.animating = true;
                self.state = LineState::Showing;
                Some(LineTransition::Entered {
                    generation: self.generation,
                })
            }
            (LineState::Showing, false) => {
                self.animating = false;
                self.state = LineState::Hidden;
                Some(LineTransition::Exited)
            }
            _ => None,
        }
    }

    /// Current presentation flags
    pub fn presentation(&self) -> LinePresentation {
        let visible = self.state == LineState::Showing;
        LinePresentation {
            visible,
            animating: self.animating,
            interactive: visible,
            aria_hidden: !visible,
            animation_generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_hidden() {
        let line = TextLine::new("Once upon a time");
        let presentation = line.presentation();
        assert_eq!(line.state(), LineState::Hidden);
        assert!(!presentation.visible);
        assert!(!presentation.interactive);
        assert!(presentation.aria_hidden);
        assert!(!presentation.animating);
    }

    #[test]
    fn test_enter_is_edge_triggered() {
        let mut line = TextLine::new("a");
        assert_eq!(
            line.set_should_show(true),
            Some(LineTransition::Entered { generation: 1 })
        );
        assert_eq!(line.set_should_show(true), None);
        assert_eq!(line.generation(), 1);

        let presentation = line.presentation();
        assert!(presentation.visible);
        assert!(presentation.interactive);
        assert!(!presentation.aria_hidden);
        assert!(presentation.animating);
    }

    #[test]
    fn test_reentry_restarts_animation() {
        let mut line = TextLine::new("a");
        line.set_should_show(true);
        assert_eq!(line.set_should_show(false), Some(LineTransition::Exited));
        assert!(!line.presentation().animating);
        assert_eq!(line.set_should_show(false), None);

        assert_eq!(
            line.set_should_show(true),
            Some(LineTransition::Entered { generation: 2 })
        );
        assert_eq!(line.presentation().animation_generation, 2);
        assert_eq!(line.text(), "a");
    }

    #[test]
    fn test_reentry_presentation_differs_only_by_generation() {
        let mut line = TextLine::new("a");
        line.set_should_show(true);
        let first = line.presentation();
        line.set_should_show(false);
        line.set_should_show(true);
        let second = line.presentation();

        assert!(second.animating);
        assert_eq!(second.animation_generation, first.animation_generation + 1);
        assert_eq!(
            LinePresentation {
                animation_generation: first.animation_generation,
                ..second
            },
            first
        );
    }
}
