use bson::{doc, DateTime, Document};
use thiserror::Error;

use crate::db::store::{strip_absent, DocumentStore, Filter, StoreError, StoredDocument, BLOGS, USERS};
use crate::models::{
    blog::{BlogDocument, BlogInput, BlogView},
    user::UserIdentity,
};

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Blog not found")]
    NotFound,
    #[error("Only the author or an admin may delete this blog")]
    NotAuthor,
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn require(value: &str, field: &'static str) -> Result<(), BlogError> {
    if value.trim().is_empty() {
        return Err(BlogError::MissingField(field));
    }
    Ok(())
}

pub async fn list_blogs(store: &dyn DocumentStore) -> Result<Vec<BlogView>, StoreError> {
    let mut blogs: Vec<(String, BlogDocument)> = store
        .find(BLOGS, Filter::All)
        .await?
        .into_iter()
        .filter_map(|stored| match stored.decode(BLOGS) {
            Ok(blog) => Some((stored.key, blog)),
            Err(e) => {
                log::warn!("Skipping unreadable blog: {}", e);
                None
            }
        })
        .collect();

    blogs.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at));
    Ok(blogs
        .into_iter()
        .map(|(id, blog)| BlogView::from_document(id, blog))
        .collect())
}

pub async fn get_blog(store: &dyn DocumentStore, id: &str) -> Result<Option<BlogView>, StoreError> {
    match store.get(BLOGS, id).await? {
        Some(stored) => {
            let blog: BlogDocument = stored.decode(BLOGS)?;
            Ok(Some(BlogView::from_document(stored.key, blog)))
        }
        None => Ok(None),
    }
}

fn blog_document(input: &BlogInput, author: Option<&UserIdentity>) -> Document {
    let mut document = doc! {
        "title": input.title.trim(),
        "summary": &input.summary,
        "content": &input.content,
        "imageUrl": input.image_url.trim(),
        "difficulty": input.difficulty.clone(),
        "distance": input.distance.clone(),
        "altitude": input.altitude.clone(),
        "bestSeason": input.best_season.clone(),
        "location": input.location.clone(),
        "authorId": author.map(|a| a.id.clone()).unwrap_or_else(|| "anonymous".to_string()),
        "authorName": match author {
            Some(a) => a.display_name.clone(),
            None => Some("Guest Explorer".to_string()),
        },
        "createdAt": DateTime::now(),
    };
    strip_absent(&mut document);
    document
}

/// Publish a blog post. Anonymous posts are allowed and attributed to a guest.
pub async fn create_blog(
    store: &dyn DocumentStore,
    input: &BlogInput,
    author: Option<&UserIdentity>,
) -> Result<BlogView, BlogError> {
    require(&input.title, "title")?;
    require(&input.content, "content")?;
    require(&input.image_url, "imageUrl")?;

    let document = blog_document(input, author);
    let id = store.add(BLOGS, document.clone()).await?;
    log::info!("Published blog {}", id);

    let stored = StoredDocument { key: id, data: document };
    let blog: BlogDocument = stored.decode(BLOGS)?;
    Ok(BlogView::from_document(stored.key, blog))
}

/// Admins are listed by email in configuration or carry `role: "admin"` on
/// their `users` document.
pub async fn is_admin(
    store: &dyn DocumentStore,
    user: &UserIdentity,
    admin_emails: &[String],
) -> Result<bool, StoreError> {
    if let Some(email) = user.email.as_deref() {
        if admin_emails.iter().any(|a| a.eq_ignore_ascii_case(email)) {
            return Ok(true);
        }
    }
    Ok(store
        .get(USERS, &user.id)
        .await?
        .map(|profile| profile.str_field("role") == Some("admin"))
        .unwrap_or(false))
}

/// The author or an admin may delete a blog.
pub async fn delete_blog(
    store: &dyn DocumentStore,
    id: &str,
    caller: &UserIdentity,
    admin_emails: &[String],
) -> Result<(), BlogError> {
    let stored = store.get(BLOGS, id).await?.ok_or(BlogError::NotFound)?;
    if stored.str_field("authorId") != Some(caller.id.as_str())
        && !is_admin(store, caller, admin_emails).await?
    {
        return Err(BlogError::NotAuthor);
    }
    store.delete(BLOGS, id).await?;
    log::info!("User {} deleted blog {}", caller.id, id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDocumentStore;

    fn input() -> BlogInput {
        BlogInput {
            title: "Snow on Kuari Pass".into(),
            content: "Three days of powder.".into(),
            image_url: "https://img.example/kuari.jpg".into(),
            ..Default::default()
        }
    }

    fn author() -> UserIdentity {
        UserIdentity {
            id: "user-9".into(),
            email: None,
            display_name: Some("Meera".into()),
        }
    }

    #[actix_rt::test]
    async fn test_required_fields() {
        let store = MemoryDocumentStore::new();
        let mut missing = input();
        missing.image_url = " ".into();
        assert!(matches!(
            create_blog(&store, &missing, None).await,
            Err(BlogError::MissingField("imageUrl"))
        ));
        assert_eq!(store.len(BLOGS).await, 0);
    }

    #[actix_rt::test]
    async fn test_anonymous_blog_is_attributed_to_guest() {
        let store = MemoryDocumentStore::new();
        let view = create_blog(&store, &input(), None).await.unwrap();
        assert_eq!(view.author_id, "anonymous");
        assert_eq!(view.author_name, "Guest Explorer");

        let stored = store.get(BLOGS, &view.id).await.unwrap().unwrap();
        assert!(!stored.data.contains_key("difficulty"));
    }

    fn caller(id: &str, email: &str) -> UserIdentity {
        UserIdentity {
            id: id.into(),
            email: Some(email.into()),
            display_name: None,
        }
    }

    #[actix_rt::test]
    async fn test_only_author_deletes() {
        let store = MemoryDocumentStore::new();
        let view = create_blog(&store, &input(), Some(&author())).await.unwrap();
        assert_eq!(view.author_name, "Meera");

        assert!(matches!(
            delete_blog(&store, &view.id, &caller("someone-else", "x@example.com"), &[]).await,
            Err(BlogError::NotAuthor)
        ));
        delete_blog(&store, &view.id, &author(), &[]).await.unwrap();
        assert!(get_blog(&store, &view.id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_admin_role_deletes_any_blog() {
        let store = MemoryDocumentStore::new();
        store.put(USERS, "mod-1", doc! { "role": "admin" }).await;
        store.put(USERS, "user-2", doc! { "role": "organizer" }).await;
        let view = create_blog(&store, &input(), Some(&author())).await.unwrap();

        assert!(matches!(
            delete_blog(&store, &view.id, &caller("user-2", "o@example.com"), &[]).await,
            Err(BlogError::NotAuthor)
        ));
        delete_blog(&store, &view.id, &caller("mod-1", "mod@example.com"), &[])
            .await
            .unwrap();
        assert_eq!(store.len(BLOGS).await, 0);
    }

    #[actix_rt::test]
    async fn test_admin_email_deletes_any_blog() {
        let store = MemoryDocumentStore::new();
        let view = create_blog(&store, &input(), None).await.unwrap();
        let admins = vec!["Editor@Example.com".to_string()];

        delete_blog(&store, &view.id, &caller("ed-1", "editor@example.com"), &admins)
            .await
            .unwrap();
        assert!(get_blog(&store, &view.id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_list_newest_first() {
        let store = MemoryDocumentStore::new();
        store
            .put(BLOGS, "a", doc! { "title": "Older", "createdAt": DateTime::from_millis(10) })
            .await;
        store
            .put(BLOGS, "b", doc! { "title": "Newer", "createdAt": DateTime::from_millis(20) })
            .await;

        let titles: Vec<_> = list_blogs(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }
}
