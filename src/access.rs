//! Who may see and manage posts.
//!
//! Visibility is role-driven: a post is either public, assigned to the
//! `everyone` sentinel, or assigned to named roles of its event. Editing
//! and deleting follow a dual path instead: the author manages their own
//! content, and staff manage everything.

use crate::client::{Post, Viewer, EVERYONE};

/// Minimum tier that may create posts and manage other people's content.
pub const STAFF_ACCESS: i32 = 2;

pub fn can_view(post: &Post, viewer: &Viewer) -> bool {
    if post.public || post.assigned_to_all() {
        return true;
    }
    post.assign_to
        .iter()
        .any(|role| role != EVERYONE && viewer.roles.iter().any(|it| it == role))
}

pub fn can_edit(post: &Post, viewer: &Viewer) -> bool {
    viewer.id == post.author || viewer.access_level >= STAFF_ACCESS
}

pub fn can_delete(post: &Post, viewer: &Viewer) -> bool {
    can_edit(post, viewer)
}

pub fn can_create(viewer: &Viewer) -> bool {
    viewer.access_level > 1
}
