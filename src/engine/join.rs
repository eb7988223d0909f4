// Tue Jan 13 2026 - Alex

use crate::model::{CommentDto, CommentResponse, PostDto, PostResponse, TodoDto, TodoResponse, UserDto, UserResponse};
use itertools::Itertools;
use std::collections::HashMap;

fn group_by_parent<T, K>(items: Vec<T>, key: K) -> HashMap<i64, Vec<T>>
where
    K: Fn(&T) -> i64,
{
    items.into_iter().into_group_map_by(|item| key(item))
}

/// Hangs every comment under the post it belongs to; each post's comments
/// end up ascending by id.
pub fn attach_comments(posts: Vec<PostResponse>, comments: Vec<CommentResponse>) -> Vec<PostDto> {
    let comments: Vec<CommentDto> = comments.into_iter().map(CommentDto::from).collect();
    let by_post = group_by_parent(comments, |c: &CommentDto| c.post_id);

    posts
        .into_iter()
        .map(|post| {
            let mut dto = PostDto::from(post);
            dto.comments = by_post.get(&dto.id).cloned().unwrap_or_default();
            dto.comments.sort_by_key(|c| c.id);
            dto
        })
        .collect()
}

/// Builds the final user tree. Children whose parent was not fetched are
/// dropped, users without children get empty lists, and the result is
/// ascending by user id.
pub fn assemble(users: Vec<UserResponse>, posts: Vec<PostDto>, todos: Vec<TodoResponse>) -> Vec<UserDto> {
    let posts_by_user = group_by_parent(posts, |p: &PostDto| p.user_id);
    let todos: Vec<TodoDto> = todos.into_iter().map(TodoDto::from).collect();
    let todos_by_user = group_by_parent(todos, |t: &TodoDto| t.user_id);

    let mut result: Vec<UserDto> = users
        .into_iter()
        .map(|user| {
            let mut dto = UserDto::from(user);
            dto.posts = posts_by_user.get(&dto.id).cloned().unwrap_or_default();
            dto.todos = todos_by_user.get(&dto.id).cloned().unwrap_or_default();
            dto
        })
        .collect();

    result.sort_by_key(|u| u.id);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_sorted_under_their_post() {
        let posts = vec![PostResponse::new(1, 10), PostResponse::new(2, 10)];
        let comments = vec![
            CommentResponse::new(9, 1),
            CommentResponse::new(3, 2),
            CommentResponse::new(4, 1),
            CommentResponse::new(1, 1),
        ];

        let posts = attach_comments(posts, comments);
        let ids: Vec<i64> = posts[0].comments.iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![1, 4, 9]);
        assert_eq!(posts[1].comments.len(), 1);
    }

    #[test]
    fn test_post_without_comments_gets_empty_list() {
        let posts = attach_comments(vec![PostResponse::new(5, 1)], Vec::new());
        assert!(posts[0].comments.is_empty());
    }

    #[test]
    fn test_users_sorted_and_children_matched() {
        let users = vec![UserResponse::new(3), UserResponse::new(1), UserResponse::new(2)];
        let posts = attach_comments(
            vec![PostResponse::new(30, 3), PostResponse::new(10, 1), PostResponse::new(11, 1)],
            Vec::new(),
        );
        let todos = vec![TodoResponse::new(100, 2)];

        let result = assemble(users, posts, todos);
        let ids: Vec<i64> = result.iter().map(|u| u.id).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result[0].posts.len(), 2);
        assert!(result[0].todos.is_empty());
        assert!(result[1].posts.is_empty());
        assert_eq!(result[1].todos.len(), 1);
        assert_eq!(result[2].posts[0].id, 30);
    }

    #[test]
    fn test_orphans_are_dropped() {
        let users = vec![UserResponse::new(1)];
        let posts = attach_comments(vec![PostResponse::new(7, 99)], vec![CommentResponse::new(1, 1234)]);
        let todos = vec![TodoResponse::new(1, 42)];

        let result = assemble(users, posts, todos);

        assert_eq!(result.len(), 1);
        assert!(result[0].posts.is_empty());
        assert!(result[0].todos.is_empty());
    }
}
