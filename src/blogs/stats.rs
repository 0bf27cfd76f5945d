//! Summary statistics over blog records.
//!
//! All functions are total: empty input gives `0` or `None`. Ties always go
//! to the record or author that appears first in the input. Like sums
//! saturate at `i64::MAX`.

use std::collections::HashMap;

use serde::Serialize;

use super::repo_types::{Blog, BlogWithUser};

/// What the statistics need from a blog record.
pub trait BlogEntry {
    fn author(&self) -> &str;
    fn likes(&self) -> i64;
}

impl BlogEntry for Blog {
    fn author(&self) -> &str {
        &self.author
    }
    fn likes(&self) -> i64 {
        self.likes
    }
}

impl BlogEntry for BlogWithUser {
    fn author(&self) -> &str {
        &self.author
    }
    fn likes(&self) -> i64 {
        self.likes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: i64,
}

/// Response of `GET /blogs/stats`.
#[derive(Debug, Serialize)]
pub struct BlogStats<B> {
    pub total_likes: i64,
    pub favorite_blog: Option<B>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

pub fn total_likes<B: BlogEntry>(blogs: &[B]) -> i64 {
    blogs
        .iter()
        .fold(0i64, |total, b| total.saturating_add(b.likes()))
}

pub fn favorite_blog<B: BlogEntry>(blogs: &[B]) -> Option<&B> {
    first_max_by_key(blogs, |b| b.likes())
}

pub fn most_blogs<B: BlogEntry>(blogs: &[B]) -> Option<AuthorBlogs> {
    first_max_by_key(tally_by_author(blogs), |t| t.blogs).map(|t| AuthorBlogs {
        author: t.author.to_owned(),
        blogs: t.blogs,
    })
}

pub fn most_likes<B: BlogEntry>(blogs: &[B]) -> Option<AuthorLikes> {
    first_max_by_key(tally_by_author(blogs), |t| t.likes).map(|t| AuthorLikes {
        author: t.author.to_owned(),
        likes: t.likes,
    })
}

pub fn summarize<B: BlogEntry + Clone>(blogs: &[B]) -> BlogStats<B> {
    BlogStats {
        total_likes: total_likes(blogs),
        favorite_blog: favorite_blog(blogs).cloned(),
        most_blogs: most_blogs(blogs),
        most_likes: most_likes(blogs),
    }
}

struct Tally<'a> {
    author: &'a str,
    blogs: usize,
    likes: i64,
}

/// One tally per distinct author, in order of first appearance.
fn tally_by_author<B: BlogEntry>(blogs: &[B]) -> Vec<Tally<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<Tally<'_>> = Vec::new();
    for blog in blogs {
        let author = blog.author();
        let i = *index.entry(author).or_insert_with(|| {
            tallies.push(Tally {
                author,
                blogs: 0,
                likes: 0,
            });
            tallies.len() - 1
        });
        let tally = &mut tallies[i];
        tally.blogs += 1;
        tally.likes = tally.likes.saturating_add(blog.likes());
    }
    tallies
}

/// Like `Iterator::max_by_key`, but the first maximal item wins.
fn first_max_by_key<T, K: Ord>(
    items: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
) -> Option<T> {
    let mut best: Option<(K, T)> = None;
    for item in items {
        let k = key(&item);
        match &best {
            Some((best_k, _)) if *best_k >= k => {}
            _ => best = Some((k, item)),
        }
    }
    best.map(|(_, item)| item)
}
