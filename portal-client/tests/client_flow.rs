//! Сквозные тесты клиента против мок-бэкенда в том же процессе.

use anyhow::Result;
use portal_api::{CommentInput, CredentialsInput, PasswordResetInput, SignUpInput, TokenPair};
use portal_client::{PortalClient, PortalError, TokenStore};
use portal_mock_server::{MockServer, Settings};

async fn server() -> Result<MockServer> {
    MockServer::spawn(Settings::for_tests()).await
}

fn credentials(email: &str) -> CredentialsInput {
    CredentialsInput {
        email: email.to_string(),
        password: "password123".to_string(),
    }
}

async fn reader_client(server: &MockServer) -> Result<PortalClient> {
    let client = PortalClient::new(server.base_url());
    client.sign_in(&credentials("reader@example.com")).await?;
    Ok(client)
}

#[tokio::test]
async fn sign_in_saves_tokens_and_opens_protected_api() -> Result<()> {
    let server = server().await?;
    let client = PortalClient::new(server.base_url());

    let user = client.sign_in(&credentials("reader@example.com")).await?;
    assert_eq!(user.email, "reader@example.com");
    assert!(client.tokens().load().is_some());

    let page = client.list_articles(1, 10).await?;
    assert!(page.meta.total_items >= 2);
    Ok(())
}

#[tokio::test]
async fn wrong_password_keeps_the_server_message() -> Result<()> {
    let server = server().await?;
    let client = PortalClient::new(server.base_url());

    let mut bad = credentials("reader@example.com");
    bad.password = "definitely-wrong".to_string();

    let err = client
        .sign_in(&bad)
        .await
        .expect_err("sign in must fail");
    match err {
        PortalError::InvalidRequest(message) => {
            assert_eq!(message, "invalid email or password")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(client.tokens().load().is_none());
    Ok(())
}

#[tokio::test]
async fn protected_request_without_session_is_unauthorized() -> Result<()> {
    let server = server().await?;
    let client = PortalClient::new(server.base_url());

    let err = client
        .list_articles(1, 10)
        .await
        .expect_err("must be unauthorized");
    assert!(matches!(err, PortalError::Unauthorized));
    Ok(())
}

#[tokio::test]
async fn expired_access_token_is_refreshed_before_send() -> Result<()> {
    let server = server().await?;
    // Access уже истёк, refresh ещё жив.
    let stale = server.token_pair_for("reader@example.com", -60, 3_600)?;
    let store = TokenStore::with_tokens(stale.clone());
    let client = PortalClient::with_store(server.base_url(), store);

    let page = client.list_articles(1, 10).await?;
    assert!(!page.items.is_empty());

    let fresh = client.tokens().load().expect("tokens survive refresh");
    assert_ne!(fresh.access_token, stale.access_token);
    Ok(())
}

#[tokio::test]
async fn forced_401_is_replayed_exactly_once() -> Result<()> {
    let server = server().await?;
    let client = reader_client(&server).await?;

    server.force_unauthorized_once();
    let page = client.list_articles(1, 10).await?;
    assert!(!page.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn sign_out_clears_the_store_even_when_the_request_fails() -> Result<()> {
    let server = server().await?;
    let client = PortalClient::with_store(
        server.base_url(),
        TokenStore::with_tokens(TokenPair {
            access_token: "broken.access.token".to_string(),
            refresh_token: "broken.refresh.token".to_string(),
        }),
    );

    let result = client.sign_out().await;
    assert!(result.is_err());
    assert!(client.tokens().load().is_none());
    Ok(())
}

#[tokio::test]
async fn sign_up_then_verify_creates_a_session() -> Result<()> {
    let server = server().await?;
    let client = PortalClient::new(server.base_url());

    let created = client
        .sign_up(&SignUpInput {
            name: "Новый читатель".to_string(),
            email: "fresh@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await?;
    assert!(!created.verified);
    assert!(client.tokens().load().is_none());

    // Верификационный токен мока равен email пользователя.
    let verified = client.verify("fresh@example.com").await?;
    assert!(verified.verified);
    assert!(client.tokens().load().is_some());
    Ok(())
}

#[tokio::test]
async fn password_reset_flow_signs_in_with_the_new_password() -> Result<()> {
    let server = server().await?;
    let client = PortalClient::new(server.base_url());

    client.forgot_password("reader@example.com").await?;
    // Повторная отправка письма тоже отвечает согласием.
    client.resend_verification("reader@example.com").await?;

    // Токен сброса мока равен email пользователя.
    client
        .reset_password(&PasswordResetInput {
            token: "reader@example.com".to_string(),
            password: "completely-new-pass".to_string(),
        })
        .await?;

    let err = client
        .sign_in(&credentials("reader@example.com"))
        .await
        .expect_err("old password is gone");
    assert!(matches!(err, PortalError::InvalidRequest(_)));

    let user = client
        .sign_in(&CredentialsInput {
            email: "reader@example.com".to_string(),
            password: "completely-new-pass".to_string(),
        })
        .await?;
    assert_eq!(user.email, "reader@example.com");
    Ok(())
}

#[tokio::test]
async fn comment_tree_and_likes_round_trip() -> Result<()> {
    let server = server().await?;
    let client = reader_client(&server).await?;

    let root = client
        .create_comment(&CommentInput {
            content: "<p>отличная статья</p>".to_string(),
            article_id: 9,
            parent_id: None,
        })
        .await?;
    assert_eq!(root.article_id, 9);
    assert!(root.parent_id.is_none());

    let reply = client
        .create_comment(&CommentInput {
            content: "<p>согласен</p>".to_string(),
            article_id: 9,
            parent_id: Some(root.id),
        })
        .await?;
    assert_eq!(reply.parent_id, Some(root.id));

    let replies = client.list_replies(root.id).await?;
    assert_eq!(replies.items.len(), 1);
    assert_eq!(replies.items[0].id, reply.id);

    // Родитель в списке уже с ненулевым счётчиком ответов.
    let page = client.list_comments(9, 1, 10).await?;
    let listed = page
        .items
        .iter()
        .find(|comment| comment.id == root.id)
        .expect("root comment is listed");
    assert_eq!(listed.child_count, 1);

    // Лайк идемпотентен, статус отражает его.
    client.like_comment(root.id).await?;
    client.like_comment(root.id).await?;
    let status = client.comment_like_status(root.id).await?;
    assert!(status.is_some());

    let page = client.list_comments(9, 1, 10).await?;
    let listed = page
        .items
        .iter()
        .find(|comment| comment.id == root.id)
        .expect("root comment is listed");
    assert_eq!(listed.like_count, 1);

    client.unlike_comment(root.id).await?;
    assert!(client.comment_like_status(root.id).await?.is_none());

    // Удаление корня сносит и ответ.
    client.delete_comment(root.id).await?;
    let replies = client
        .list_replies(root.id)
        .await
        .expect_err("parent is gone");
    assert!(matches!(replies, PortalError::NotFound));
    Ok(())
}

#[tokio::test]
async fn upload_returns_a_public_url() -> Result<()> {
    let server = server().await?;
    let client = reader_client(&server).await?;

    let uploaded = client.upload("cover image.png", b"png-bytes").await?;
    assert!(uploaded.url.starts_with("https://cdn.example.com/"));
    Ok(())
}
