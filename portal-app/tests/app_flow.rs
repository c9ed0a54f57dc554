//! Сквозные тесты ядра приложения против мок-бэкенда: реальный
//! HTTP-клиент за портом комментариев, реальные токены в гарде.

use std::sync::Arc;

use anyhow::Result;
use portal_api::{CommentInput, CredentialsInput};
use portal_client::PortalClient;
use portal_mock_server::{MockServer, Settings};

use portal_app::cache::CacheService;
use portal_app::comments::CommentSync;
use portal_app::guard::{self, RouteDecision};
use portal_app::hooks::Hooks;
use portal_app::notify::RecordingNotifier;

const READER: &str = "reader@example.com";
const ARTICLE_ID: i64 = 9;

async fn signed_in_reader(server: &MockServer) -> Result<(PortalClient, portal_api::User)> {
    let client = PortalClient::new(server.base_url());
    let user = client
        .sign_in(&CredentialsInput {
            email: READER.to_string(),
            password: "password123".to_string(),
        })
        .await?;
    Ok((client, user))
}

fn sync_over(client: &PortalClient) -> (CommentSync, RecordingNotifier, CacheService) {
    let cache = CacheService::new();
    let notifier = RecordingNotifier::new();
    let sync = CommentSync::new(
        Arc::new(client.clone()),
        cache.clone(),
        Arc::new(notifier.clone()),
    );
    (sync, notifier, cache)
}

#[tokio::test]
async fn submitted_comment_survives_a_refetch() -> Result<()> {
    let server = MockServer::spawn(Settings::for_tests()).await?;
    let (client, user) = signed_in_reader(&server).await?;
    let (sync, notifier, _cache) = sync_over(&client);

    // Прогреваем кэш и публикуем.
    sync.comments_page(ARTICLE_ID, 1, 10).await?;
    let confirmed = sync
        .submit(
            &user,
            CommentInput {
                content: "<p>живой комментарий</p>".to_string(),
                article_id: ARTICLE_ID,
                parent_id: None,
            },
        )
        .await?;
    assert!(confirmed.id > 0);
    assert!(!notifier.successes().is_empty());

    // Список протух после успеха: страница перечитывается с сервера
    // и содержит подтверждённую запись.
    let page = sync.comments_page(ARTICLE_ID, 1, 10).await?;
    assert!(page.items.iter().any(|comment| comment.id == confirmed.id));
    assert!(page.items.iter().all(|comment| !comment.is_optimistic));
    Ok(())
}

#[tokio::test]
async fn reply_flow_updates_child_count_after_invalidation() -> Result<()> {
    let server = MockServer::spawn(Settings::for_tests()).await?;
    let (client, user) = signed_in_reader(&server).await?;
    let (sync, _, _) = sync_over(&client);

    let root = sync
        .submit(
            &user,
            CommentInput {
                content: "<p>корень</p>".to_string(),
                article_id: ARTICLE_ID,
                parent_id: None,
            },
        )
        .await?;

    sync.replies(root.id).await?;
    let reply = sync
        .submit(
            &user,
            CommentInput {
                content: "<p>ответ</p>".to_string(),
                article_id: ARTICLE_ID,
                parent_id: Some(root.id),
            },
        )
        .await?;

    let replies = sync.replies(root.id).await?;
    assert_eq!(replies.items.len(), 1);
    assert_eq!(replies.items[0].id, reply.id);

    let page = sync.comments_page(ARTICLE_ID, 1, 10).await?;
    let listed = page
        .items
        .iter()
        .find(|comment| comment.id == root.id)
        .expect("root is listed");
    assert_eq!(listed.child_count, 1);
    Ok(())
}

#[tokio::test]
async fn like_toggle_reconciles_with_the_server() -> Result<()> {
    let server = MockServer::spawn(Settings::for_tests()).await?;
    let (client, user) = signed_in_reader(&server).await?;
    let (sync, _, _) = sync_over(&client);

    let comment = sync
        .submit(
            &user,
            CommentInput {
                content: "<p>лайкните меня</p>".to_string(),
                article_id: ARTICLE_ID,
                parent_id: None,
            },
        )
        .await?;

    let liked = sync.toggle_like(user.id, ARTICLE_ID, comment.id).await?;
    assert!(liked);
    let page = sync.comments_page(ARTICLE_ID, 1, 10).await?;
    let listed = page
        .items
        .iter()
        .find(|c| c.id == comment.id)
        .expect("comment is listed");
    assert_eq!(listed.like_count, 1);

    let liked = sync.toggle_like(user.id, ARTICLE_ID, comment.id).await?;
    assert!(!liked);
    let page = sync.comments_page(ARTICLE_ID, 1, 10).await?;
    let listed = page
        .items
        .iter()
        .find(|c| c.id == comment.id)
        .expect("comment is listed");
    assert_eq!(listed.like_count, 0);
    Ok(())
}

#[tokio::test]
async fn deleted_comment_disappears_from_the_feed() -> Result<()> {
    let server = MockServer::spawn(Settings::for_tests()).await?;
    let (client, user) = signed_in_reader(&server).await?;
    let (sync, notifier, _) = sync_over(&client);

    let comment = sync
        .submit(
            &user,
            CommentInput {
                content: "<p>на удаление</p>".to_string(),
                article_id: ARTICLE_ID,
                parent_id: None,
            },
        )
        .await?;

    sync.delete(&comment).await?;
    assert!(notifier.successes().contains(&"Комментарий удалён".to_string()));

    let page = sync.comments_page(ARTICLE_ID, 1, 10).await?;
    assert!(page.items.iter().all(|c| c.id != comment.id));
    Ok(())
}

#[tokio::test]
async fn guard_routes_real_tokens_by_role() -> Result<()> {
    let server = MockServer::spawn(Settings::for_tests()).await?;

    let admin = server.token_pair_for("admin@example.com", 900, 3_600)?;
    assert_eq!(
        guard::evaluate("/", Some(&admin.access_token), false),
        RouteDecision::Redirect(guard::ADMIN_DASHBOARD_PATH.to_string())
    );

    let reader = server.token_pair_for(READER, 900, 3_600)?;
    assert_eq!(
        guard::evaluate("/articles/tech", Some(&reader.access_token), false),
        RouteDecision::Allow
    );

    let unverified = server.token_pair_for("unverified@example.com", 900, 3_600)?;
    assert_eq!(
        guard::evaluate("/articles/tech", Some(&unverified.access_token), false),
        RouteDecision::Redirect(guard::VERIFY_PATH.to_string())
    );
    Ok(())
}

#[tokio::test]
async fn feature_mutation_invalidates_the_article_list() -> Result<()> {
    use portal_api::ArticleInput;
    use portal_app::cache::CacheKey;
    use portal_app::features::articles::Articles;

    let server = MockServer::spawn(Settings::for_tests()).await?;
    let client = PortalClient::new(server.base_url());
    client
        .sign_in(&CredentialsInput {
            email: "reporter@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await?;

    let cache = CacheService::new();
    let notifier = RecordingNotifier::new();
    let articles = Articles::new(
        client.clone(),
        Hooks::new(cache.clone(), Arc::new(notifier.clone())),
    );

    let before = articles.page(1, 10).await?;
    let outcome = articles
        .create(
            &ArticleInput {
                title: "Свежая новость".to_string(),
                content: "<p>текст</p>".to_string(),
                category_id: 5,
                tag_ids: vec![7],
                cover_url: None,
            },
            Some("/reporter/dashboard/articles"),
        )
        .await?;
    assert_eq!(outcome.redirect.as_deref(), Some("/reporter/dashboard/articles"));
    assert!(cache.is_stale(CacheKey::Articles));

    let after = articles.page(1, 10).await?;
    assert_eq!(after.meta.total_items, before.meta.total_items + 1);
    assert!(
        after
            .items
            .iter()
            .any(|article| article.id == outcome.value.id)
    );
    Ok(())
}
