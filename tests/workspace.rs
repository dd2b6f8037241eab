//! End-to-end flow over an in-memory store: author a post, list it through
//! the board, edit it, delete it.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use evently::{
    access,
    error::{Error, ValidationError},
    Ballot, Event, EventListing, EventScope, Post, PostBody, PostController, PostDraft, PostKind, PostStore, SortBy, Staff, Status,
    Viewer, EVERYONE,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

#[derive(Default)]
struct MemoryStore {
    posts: Mutex<Vec<Post>>,
    next_id: Mutex<u32>,
    fail: AtomicBool,
}

impl MemoryStore {
    fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, event_id: &str, mut post: Post) -> Result<Post> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("store unavailable");
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        post.id = format!("p{}", *next);
        post.event = event_id.to_owned();
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, post: Post) -> Result<Post> {
        let mut posts = self.posts.lock().unwrap();
        let Some(slot) = posts.iter_mut().find(|it| it.id == post.id) else {
            bail!("no such post");
        };
        *slot = post.clone();
        Ok(post)
    }

    async fn delete_post(&self, _event_id: &str, post_id: &str) -> Result<()> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|it| it.id != post_id);
        if posts.len() == before {
            bail!("no such post");
        }
        Ok(())
    }
}

fn at(s: &str) -> DateTime<Utc> {
    evently::time::parse_instant(s).unwrap()
}

fn workspace() -> Event {
    let mut event = Event {
        id: "ev1".into(),
        event_name: "Orientation".into(),
        event_description: "Welcome week".into(),
        start_date: at("2024-01-10T00:00:00Z"),
        end_date: at("2024-01-20T00:00:00Z"),
        participants: vec!["member".into()],
        staff: vec![Staff { std_id: "staffer".into(), role: "staff".into() }],
        roles: vec!["staff".into(), "mentor".into()],
        poster: None,
        icon: None,
    };
    event.normalize_roles();
    event
}

fn staffer(event: &Event) -> Viewer {
    Viewer::for_event("staffer", 2, event)
}

fn member(event: &Event) -> Viewer {
    Viewer::for_event("member", 1, event)
}

fn vote_draft(end: DateTime<Utc>) -> PostDraft {
    PostDraft {
        title: "Lunch vote".into(),
        description: "Pick a place".into(),
        assign_to: vec!["staff".into()],
        public: false,
        end_date: Some(end),
        author: "staffer".into(),
        body: PostBody::Vote(Ballot {
            question: "Where?".into(),
            options: vec!["A".into(), "B".into()],
        }),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn author_edit_delete_round_trip() {
    let store = Arc::new(MemoryStore::default());
    let controller = PostController::new(Arc::clone(&store));
    let event = workspace();
    let now = at("2024-01-11T09:00:00Z");

    let viewer = staffer(&event);
    assert!(access::can_create(&viewer));

    let created = controller
        .create(&event, vote_draft(now + Duration::days(2)), now)
        .await
        .unwrap();
    assert_eq!(created.id, "p1");
    assert_eq!(created.kind(), PostKind::Vote);

    // the caller re-fetches after a confirmed success
    let mut board = evently::PostBoard::new(event.clone());
    board.set_posts(store.posts());
    assert_eq!(board.view(&viewer).len(), 1);
    // the member holds no staff role and sees nothing
    assert!(board.view(&member(&event)).is_empty());

    // full-record replace keeps kind, author and id
    let mut patch = vote_draft(now + Duration::days(3));
    patch.title = "Dinner vote".into();
    let updated = controller.update(&event, &created, patch, now).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Dinner vote");

    controller.delete(&event.id, &created.id).await.unwrap();
    assert!(store.posts().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn kind_changes_are_rejected() {
    let store = Arc::new(MemoryStore::default());
    let controller = PostController::new(Arc::clone(&store));
    let event = workspace();
    let now = at("2024-01-11T09:00:00Z");

    let created = controller
        .create(&event, vote_draft(now + Duration::days(1)), now)
        .await
        .unwrap();

    let mut patch = vote_draft(now + Duration::days(1));
    patch.body = PostBody::Plain { markdown: "now a post".into() };
    let err = controller.update(&event, &created, patch, now).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::KindChanged)));

    let mut patch = vote_draft(now + Duration::days(1));
    patch.author = "impostor".into();
    let err = controller.update(&event, &created, patch, now).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::AuthorChanged)));
}

#[tokio::test(flavor = "multi_thread")]
async fn validation_precedes_transport() {
    let store = Arc::new(MemoryStore::default());
    store.fail.store(true, Ordering::SeqCst);
    let controller = PostController::new(Arc::clone(&store));
    let event = workspace();
    let now = at("2024-01-11T09:00:00Z");

    // an invalid draft never reaches the failing store
    let mut draft = vote_draft(now + Duration::days(1));
    draft.end_date = None;
    let err = controller.create(&event, draft, now).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::EndDateRequired(PostKind::Vote))
    ));

    // a valid one surfaces the transport failure untouched, with nothing
    // committed locally
    let err = controller
        .create(&event, vote_draft(now + Duration::days(1)), now)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(store.posts().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn pending_writes_resolve_independently() {
    let store = Arc::new(MemoryStore::default());
    let controller = PostController::new(Arc::clone(&store));
    let event = workspace();
    let now = at("2024-01-11T09:00:00Z");

    let mut first = controller.create_task(event.clone(), vote_draft(now + Duration::days(1)), now);
    let mut second = controller.create_task(event.clone(), vote_draft(now + Duration::days(2)), now);

    let mut results = Vec::new();
    for _ in 0..100 {
        if let Some(result) = first.take() {
            results.push(result);
        }
        if let Some(result) = second.take() {
            results.push(result);
        }
        if results.len() == 2 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    // both deliver; the caller reconciles by re-fetching
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|it| it.is_ok()));
    assert_eq!(store.posts().len(), 2);

    let victim = store.posts()[0].id.clone();
    let mut deletion = controller.delete_task(event.id.clone(), victim);
    let mut outcome = None;
    for _ in 0..100 {
        if let Some(result) = deletion.take() {
            outcome = Some(result);
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(matches!(outcome, Some(Ok(()))));
    assert_eq!(store.posts().len(), 1);
}

#[test]
fn listing_projection_matches_the_documented_order() {
    let mut listing = EventListing::new(EventScope::All);
    let mut a = workspace();
    a.id = "a".into();
    a.event_name = "B".into();
    a.start_date = at("2024-01-01T00:00:00Z");
    let mut b = workspace();
    b.id = "b".into();
    b.event_name = "A".into();
    b.start_date = at("2024-01-01T00:00:00Z");
    listing.set_events(vec![a, b]);

    let anybody = Viewer { id: "x".into(), access_level: 1, roles: vec![] };
    let now = at("2024-01-02T00:00:00Z");

    listing.sort = SortBy::DateAsc;
    let names: Vec<String> = listing.view(&anybody, now).into_iter().map(|it| it.event_name).collect();
    assert_eq!(names, ["A", "B"]);

    listing.sort = SortBy::DateDsc;
    let names: Vec<String> = listing.view(&anybody, now).into_iter().map(|it| it.event_name).collect();
    assert_eq!(names, ["B", "A"]);
}

#[test]
fn event_status_scenarios() {
    let event = workspace();
    assert_eq!(event.status(at("2024-01-10T00:00:00Z")), Status::Ongoing);
    assert_eq!(event.status(at("2024-01-09T23:59:59Z")), Status::Upcoming);
    assert_eq!(event.status(at("2024-01-20T00:00:01Z")), Status::Ended);
}

#[test]
fn denied_actions_report_the_action() {
    let event = workspace();
    let viewer = member(&event);
    assert!(!access::can_create(&viewer));
    let err = Error::AccessDenied(evently::error::Action::Create);
    assert_eq!(err.to_string(), "access denied: create");
}

#[test]
fn everyone_assignment_is_visible_to_members() {
    let event = workspace();
    let post = Post {
        id: "p9".into(),
        event: event.id.clone(),
        title: "Open call".into(),
        description: String::new(),
        assign_to: vec![EVERYONE.into()],
        public: false,
        post_date: at("2024-01-11T00:00:00Z"),
        end_date: None,
        author: "staffer".into(),
        body: PostBody::Plain { markdown: "hi".into() },
    };
    assert!(access::can_view(&post, &member(&event)));
}
