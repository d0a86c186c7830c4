//! Auto-tagging of scene nodes by naming convention.
//!
//! Content authors opt a node into click playback by putting the tag substring
//! in its display name. Matching is literal, case-sensitive containment with no
//! escaping, so a name that merely happens to contain the tag is opted in too.

use log::debug;

use crate::scene::{MarkerSink, SceneGraph, CLICK_ANIMATION_MARKERS};

#[derive(Clone, Debug)]
pub struct AutoTagger {
    tag: String,
}

impl AutoTagger {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn matches(&self, name: &str) -> bool {
        name.contains(self.tag.as_str())
    }

    /// Attach the click-animation markers to every newly appeared entity whose
    /// node name matches. Returns how many entities were tagged.
    pub fn scan<G, S>(
        &self,
        new_entities: impl IntoIterator<Item = G::Entity>,
        graph: &G,
        sink: &mut S,
    ) -> usize
    where
        G: SceneGraph,
        S: MarkerSink<G::Entity>,
    {
        let mut tagged = 0;
        for entity in new_entities {
            let Some(node) = graph.node_of(entity) else {
                continue;
            };
            let Some(name) = graph.display_name(node) else {
                continue;
            };
            if self.matches(name) {
                debug!("auto-tag: '{name}' opted into click animation");
                sink.attach(entity, &CLICK_ANIMATION_MARKERS);
                tagged += 1;
            }
        }
        tagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_NAME_TAG;

    #[test]
    fn substring_containment_is_literal() {
        let t = AutoTagger::new(DEFAULT_NAME_TAG);
        assert!(t.matches("Door_interactive_animation"));
        assert!(t.matches("_interactive_animation"));
        assert!(t.matches("Lid_interactive_animation.001"));
        assert!(!t.matches("Door"));
        assert!(!t.matches("Door_Interactive_Animation"));
        assert!(!t.matches("interactive_animation"));
    }
}
