use std::ops::{Deref, DerefMut};

use crate::{
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scene::scroll_scene::ScrollScene,
};

/// A self-contained piece of page choreography.
///
/// Everything registered through the [`MountCtx`] during [`Section::mount`]
/// belongs to the mount and is torn down by [`ScrollScene::unmount`].
pub trait Section {
    fn name(&self) -> &str;

    /// Elements the section expects to find in the document.
    fn elements(&self) -> Vec<ElementId>;

    fn mount(&self, ctx: &mut MountCtx<'_>) -> ScrollweaveResult<()>;
}

/// Registration surface handed to [`Section::mount`].
pub struct MountCtx<'a> {
    scene: &'a mut ScrollScene,
}

impl<'a> MountCtx<'a> {
    pub(crate) fn new(scene: &'a mut ScrollScene) -> Self {
        Self { scene }
    }

    /// `id` if it is in the document, otherwise a layout error naming `what`.
    pub fn require(&self, id: ElementId, what: &str) -> ScrollweaveResult<ElementId> {
        if self.scene.document().contains(id) {
            Ok(id)
        } else {
            Err(ScrollweaveError::layout(format!("{what} ({id}) is not in the document")))
        }
    }
}

impl Deref for MountCtx<'_> {
    type Target = ScrollScene;

    fn deref(&self) -> &ScrollScene {
        self.scene
    }
}

impl DerefMut for MountCtx<'_> {
    fn deref_mut(&mut self) -> &mut ScrollScene {
        self.scene
    }
}
