use leadmachine_auth::error::AuthServiceError;
use leadmachine_auth::usecase::access_code::{
    ListValidCodesUseCase, PurgeExpiredUseCase, RequestAccessCodeInput, RequestAccessCodeUseCase,
};
use leadmachine_domain::access_code::{ACCESS_CODE_LEN, AccessCode};

use crate::helpers::{
    MockAccessCodeRepo, MockNotifier, TEST_EMAIL, TEST_SENDER, test_access_code, test_app_origin,
};

fn request_usecase(
    codes: MockAccessCodeRepo,
    notifier: MockNotifier,
) -> RequestAccessCodeUseCase<MockAccessCodeRepo, MockNotifier> {
    RequestAccessCodeUseCase {
        codes,
        notifier,
        app_origin: test_app_origin(),
        sender_email: TEST_SENDER.to_owned(),
    }
}

#[tokio::test]
async fn should_record_and_deliver_a_code_for_a_well_formed_email() {
    let repo = MockAccessCodeRepo::empty();
    let history = repo.history_handle();
    let notifier = MockNotifier::new();
    let sent = notifier.sent_handle();

    let uc = request_usecase(repo, notifier);
    uc.execute(RequestAccessCodeInput {
        email: TEST_EMAIL.to_owned(),
    })
    .await
    .unwrap();

    let history = history.lock().unwrap();
    assert_eq!(history.len(), 1, "expected exactly one code to be recorded");
    let created = &history.as_slice()[0];
    assert_eq!(created.email, TEST_EMAIL);
    assert_eq!(created.code.len(), ACCESS_CODE_LEN);
    assert!(created.used_at.is_none(), "new code should not be used");
    assert!(created.expires_at > chrono::Utc::now());

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1, "expected exactly one delivery");
    let delivery = &sent[0];
    assert_eq!(delivery.to_email, TEST_EMAIL);
    assert_eq!(delivery.from_email, TEST_SENDER);
    assert_eq!(delivery.access_code, created.code);
    assert_eq!(delivery.expires_in_mins, 15);
    assert!(delivery.login_link.contains("email=lead%40example.com"));
    assert!(delivery.login_link.contains(&format!("code={}", created.code)));
}

#[tokio::test]
async fn should_reject_a_malformed_email_before_recording_anything() {
    let repo = MockAccessCodeRepo::empty();
    let history = repo.history_handle();
    let notifier = MockNotifier::new();
    let sent = notifier.sent_handle();

    let uc = request_usecase(repo, notifier);
    let result = uc
        .execute(RequestAccessCodeInput {
            email: "not-an-email".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidEmail)),
        "expected InvalidEmail, got {result:?}"
    );
    assert!(history.lock().unwrap().is_empty());
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_surface_delivery_failure_after_recording_the_code() {
    let repo = MockAccessCodeRepo::empty();
    let history = repo.history_handle();

    let uc = request_usecase(repo, MockNotifier::failing());
    let result = uc
        .execute(RequestAccessCodeInput {
            email: TEST_EMAIL.to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::DeliveryFailed)),
        "expected DeliveryFailed, got {result:?}"
    );
    // The code was recorded before the send was attempted.
    assert_eq!(history.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_list_only_valid_codes_for_the_requested_email() {
    let mine = test_access_code(TEST_EMAIL);
    let other = test_access_code("other@example.com");
    let mut used = test_access_code(TEST_EMAIL);
    used.mark_used(chrono::Utc::now());

    let uc = ListValidCodesUseCase {
        codes: MockAccessCodeRepo::new(vec![mine.clone(), other, used]),
    };

    let listed = uc.execute(TEST_EMAIL).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);
}

#[tokio::test]
async fn should_report_the_number_of_purged_codes() {
    let expired = AccessCode::issue(
        TEST_EMAIL.to_owned(),
        "999999".to_owned(),
        chrono::Utc::now() - chrono::Duration::minutes(30),
    );
    let fresh = test_access_code(TEST_EMAIL);

    let repo = MockAccessCodeRepo::new(vec![expired, fresh]);
    let history = repo.history_handle();

    let uc = PurgeExpiredUseCase { codes: repo };
    let removed = uc.execute().await.unwrap();

    assert_eq!(removed, 1);
    assert_eq!(history.lock().unwrap().len(), 1);
}
