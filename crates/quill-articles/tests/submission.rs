//! End-to-end submission flows against scripted collaborators.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use quill_articles::{
    ArticleApi, ArticleForm, ArticleScreen, Category, CreateArticleRequest, CreatedArticle,
    FormField, Navigator, Notification, NotificationKind, Notifier, SelectedFile, SubmitOutcome,
    SubmitState,
};
use quill_common::{ApiError, AppConfig, FormConfig, ValidationPolicy};
use quill_editor_core::{FormatCommand, MarkupHost, PromptKind, PromptOutcome};

#[derive(Clone, Copy)]
enum Script {
    Create,
    Refuse,
    Throw,
}

#[derive(Clone)]
struct ScriptedApi {
    script: Script,
    requests: Arc<Mutex<Vec<CreateArticleRequest>>>,
}

impl ScriptedApi {
    fn new(script: Script) -> Self {
        Self {
            script,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn requests(&self) -> Vec<CreateArticleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ArticleApi for ScriptedApi {
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(vec![
            Category {
                id: "news".into(),
                name: "News".into(),
            },
            Category {
                id: "events".into(),
                name: "Events".into(),
            },
        ])
    }

    async fn create_article(
        &self,
        request: CreateArticleRequest,
    ) -> Result<Option<CreatedArticle>, ApiError> {
        self.requests.lock().unwrap().push(request);
        match self.script {
            Script::Create => Ok(Some(CreatedArticle { id: "17".into() })),
            Script::Refuse => Ok(None),
            Script::Throw => Err(ApiError::Status {
                status: 500,
                body: "internal".into(),
            }),
        }
    }
}

#[derive(Default)]
struct Inbox(Mutex<Vec<Notification>>);

impl Inbox {
    fn all(&self) -> Vec<Notification> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for Inbox {
    fn notify(&self, notification: Notification) {
        self.0.lock().unwrap().push(notification);
    }
}

#[derive(Default)]
struct Routes {
    now: Mutex<Vec<String>>,
    later: Mutex<Vec<(Duration, String)>>,
}

impl Navigator for Routes {
    fn navigate(&self, route: &str) {
        self.now.lock().unwrap().push(route.to_owned());
    }

    fn schedule(&self, delay: Duration, route: &str) {
        self.later.lock().unwrap().push((delay, route.to_owned()));
    }
}

type TestForm = ArticleForm<ScriptedApi, Arc<Inbox>, Arc<Routes>>;

struct Harness {
    api: ScriptedApi,
    inbox: Arc<Inbox>,
    routes: Arc<Routes>,
}

impl Harness {
    fn new(script: Script) -> Self {
        Self {
            api: ScriptedApi::new(script),
            inbox: Arc::new(Inbox::default()),
            routes: Arc::new(Routes::default()),
        }
    }

    fn form(&self, config: FormConfig) -> TestForm {
        ArticleForm::new(
            config,
            self.api.clone(),
            self.inbox.clone(),
            self.routes.clone(),
        )
    }
}

fn body_markup() -> String {
    format!("<p>{}</p>", "Training starts next week. ".repeat(3))
}

fn fill_valid(form: &mut TestForm) {
    form.set_title("New trainer onboarding");
    form.set_category("news");
    form.set_short_description("What new trainers should expect");
    form.set_content(body_markup());
    form.set_tags("onboarding, trainers ,");
}

#[tokio::test]
async fn test_successful_submission() {
    let harness = Harness::new(Script::Create);
    let mut form = harness.form(FormConfig::default());
    fill_valid(&mut form);
    let before = form.draft().clone();

    let outcome = form.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Created(CreatedArticle { id: "17".into() })
    );

    let notes = harness.inbox.all();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Success);

    assert_eq!(
        *harness.routes.later.lock().unwrap(),
        vec![(Duration::from_millis(1500), "/news".to_owned())]
    );
    assert!(harness.routes.now.lock().unwrap().is_empty());

    // Draft is left alone until the screen navigates away.
    assert_eq!(form.draft(), &before);
    assert!(form.errors().is_empty());
    assert_eq!(form.state(), SubmitState::Succeeded);
    assert!(!form.is_loading());
    assert!(!form.can_submit());

    let sent = harness.api.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].tags, vec!["onboarding", "trainers"]);
    assert_eq!(sent[0].short_description, "What new trainers should expect");
}

#[tokio::test]
async fn test_submit_after_success_is_busy() {
    let harness = Harness::new(Script::Create);
    let mut form = harness.form(FormConfig::default());
    fill_valid(&mut form);
    form.submit().await;
    assert_eq!(form.submit().await, SubmitOutcome::Busy);
    assert_eq!(harness.api.requests().len(), 1);
}

#[tokio::test]
async fn test_thrown_failure_preserves_draft() {
    let harness = Harness::new(Script::Throw);
    let mut form = harness.form(FormConfig::default());
    fill_valid(&mut form);
    let before = form.draft().clone();

    assert_eq!(form.submit().await, SubmitOutcome::Failed);

    let notes = harness.inbox.all();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].is_error());
    assert!(!form.is_loading());
    assert!(form.can_submit());
    assert_eq!(form.draft(), &before);
    assert!(harness.routes.later.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_refusal_allows_retry() {
    let harness = Harness::new(Script::Refuse);
    let mut form = harness.form(FormConfig::default());
    fill_valid(&mut form);

    assert_eq!(form.submit().await, SubmitOutcome::Rejected);
    assert_eq!(form.state(), SubmitState::Idle);
    assert_eq!(form.submit().await, SubmitOutcome::Rejected);

    assert_eq!(harness.api.requests().len(), 2);
    assert_eq!(harness.inbox.all().len(), 2);
}

#[tokio::test]
async fn test_invalid_scenario_never_calls_api() {
    let harness = Harness::new(Script::Create);
    let mut form = harness.form(FormConfig::default());
    form.set_title("Hi");
    form.set_category("");
    form.set_short_description("short desc text");
    form.set_content("x".repeat(50));

    assert_eq!(form.submit().await, SubmitOutcome::Invalid);
    let fields: Vec<_> = form.errors().fields().collect();
    assert_eq!(fields, vec![FormField::Title, FormField::Category]);
    assert!(harness.api.requests().is_empty());
    assert!(harness.inbox.all().is_empty());
}

#[tokio::test]
async fn test_first_failure_policy() {
    let harness = Harness::new(Script::Create);
    let mut form = harness.form(FormConfig {
        validation_policy: ValidationPolicy::FirstFailureWins,
        ..FormConfig::default()
    });
    assert!(!form.validate_form());
    assert_eq!(form.field_error(FormField::Title), Some("Title is required"));
    assert_eq!(
        form.field_error(FormField::Content),
        Some("Content is required")
    );
}

#[tokio::test]
async fn test_image_travels_with_request() {
    let harness = Harness::new(Script::Create);
    let mut form = harness.form(FormConfig::default());
    fill_valid(&mut form);

    let mut png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    png.resize(512, 0);
    let request = form
        .select_image(SelectedFile::new("cover.png", png))
        .unwrap();
    let preview = request.render().await;
    assert!(form.apply_preview(preview));
    assert!(
        form.preview()
            .unwrap()
            .data_url
            .starts_with("data:image/png;base64,")
    );

    form.submit().await;
    let sent = harness.api.requests();
    let image = sent[0].image.as_ref().unwrap();
    assert_eq!(image.name, "cover.png");
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.len(), 512);
}

#[tokio::test]
async fn test_screen_submits_editor_content() {
    let harness = Harness::new(Script::Create);
    let mut form = harness.form(FormConfig::default());
    assert!(form.load_categories().await);
    assert_eq!(form.categories().len(), 2);
    form.set_title("Spring schedule");
    form.set_category("events");
    form.set_short_description("Courses opening in spring");

    let mut screen = ArticleScreen::new(MarkupHost::default(), form, &AppConfig::default());
    screen.with_editor(|editor| {
        editor
            .host_mut()
            .type_text("Registration opens on Monday for all spring courses ");
        editor.handle_input()
    });
    screen.open_prompt(PromptKind::Link);
    assert_eq!(
        screen.resolve_prompt_with("https://example.org/spring"),
        PromptOutcome::Inserted
    );
    assert!(screen.apply(FormatCommand::Undo));
    assert!(screen.apply(FormatCommand::Redo));

    let outcome = screen.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Created(_)));

    let sent = harness.api.requests();
    assert!(sent[0].content.starts_with("Registration opens on Monday"));
    assert!(
        sent[0]
            .content
            .ends_with(r#"<a href="https://example.org/spring">https://example.org/spring</a>"#)
    );
    assert_eq!(sent[0].content, screen.editor().markup());
}
