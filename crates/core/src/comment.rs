//! Comments: the two-level nesting rule and flat-list to tree conversion.
//!
//! A comment with `parent_id == None` is top-level; a reply must point at a
//! top-level comment, so threads are at most two levels deep.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub like_count: i32,
    pub helpful_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Comment {
    pub fn is_archived(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Input for inserting a comment. Counters start at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: DbId,
    pub author_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
}

/// A comment together with its replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

/// The parent must live under the same post as the new reply.
///
/// A parent from another post is reported as not found: from the caller's
/// point of view it does not exist in this thread.
pub fn ensure_parent_in_post(parent: &Comment, post_id: DbId) -> Result<(), CoreError> {
    if parent.post_id != post_id {
        return Err(CoreError::ParentCommentNotFound(parent.id));
    }
    Ok(())
}

/// Conflict checks for replying to `parent`.
pub fn ensure_can_reply(parent: &Comment) -> Result<(), CoreError> {
    if parent.is_archived() {
        return Err(CoreError::CannotReplyToArchivedComment(parent.id));
    }
    if !parent.is_top_level() {
        return Err(CoreError::MaxNestingDepthExceeded);
    }
    Ok(())
}

/// Archived comments are immutable.
pub fn ensure_mutable(comment: &Comment) -> Result<(), CoreError> {
    if comment.is_archived() {
        return Err(CoreError::CannotModifyArchivedComment(comment.id));
    }
    Ok(())
}

/// Archiving twice is rejected rather than ignored.
pub fn ensure_archivable(comment: &Comment) -> Result<(), CoreError> {
    if comment.is_archived() {
        return Err(CoreError::CommentAlreadyArchived(comment.id));
    }
    Ok(())
}

/// Arrange a flat list of comments for one post into threads.
///
/// Roots keep their input order, and replies keep their input order under
/// each parent. A comment whose parent is absent from `flat` is dropped
/// together with anything below it.
pub fn build_tree(flat: Vec<Comment>) -> Vec<CommentNode> {
    let ids: HashSet<DbId> = flat.iter().map(|c| c.id).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<DbId, Vec<Comment>> = HashMap::new();
    for comment in flat {
        match comment.parent_id {
            None => roots.push(comment),
            Some(parent_id) if ids.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(comment);
            }
            Some(_) => {}
        }
    }

    roots
        .into_iter()
        .map(|root| attach_replies(root, &mut children))
        .collect()
}

fn attach_replies(comment: Comment, children: &mut HashMap<DbId, Vec<Comment>>) -> CommentNode {
    let replies = children
        .remove(&comment.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach_replies(child, children))
        .collect();
    CommentNode { comment, replies }
}

/// Pre-order traversal of a tree back into a flat list.
pub fn flatten_tree(nodes: &[CommentNode]) -> Vec<Comment> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(node.comment.clone());
        out.extend(flatten_tree(&node.replies));
    }
    out
}

/// Remove archived comments from a tree built over all comments.
///
/// An archived comment that still has visible replies stays in place as a
/// tombstone (body cleared, `deleted_at` set) so its replies keep their
/// thread.
pub fn prune_archived(nodes: Vec<CommentNode>) -> Vec<CommentNode> {
    nodes
        .into_iter()
        .filter_map(|node| {
            let replies = prune_archived(node.replies);
            let mut comment = node.comment;
            if comment.is_archived() {
                if replies.is_empty() {
                    return None;
                }
                comment.content.clear();
            }
            Some(CommentNode { comment, replies })
        })
        .collect()
}

/// Total number of comments in a tree.
pub fn count_nodes(nodes: &[CommentNode]) -> usize {
    nodes.iter().map(|n| 1 + count_nodes(&n.replies)).sum()
}
