use civics_core::model::{
    AnswerRecord, GameSettings, HistoryMap, PairedQuestionId, QuestionNumber,
};
use civics_core::random::RngSource;
use civics_core::time::fixed_now;
use civics_core::{NewSession, SubmittedAnswer, create_session, result_of, submit_answer};
use chrono::Duration;
use storage::repository::{
    HistoryRepository, InMemoryRepository, ResultRepository, SettingsRepository, Storage,
};
use storage::load_question_bank;

const BANK: &str = r#"{
    "questions": [
        {
            "questionNumber": 1,
            "theme": "American Government",
            "section": "Principles of American Government",
            "question": "What is the supreme law of the land?",
            "answerType": "text",
            "choices": ["the Constitution"]
        },
        {
            "questionNumber": 44,
            "theme": "American Government",
            "section": "System of Government",
            "question": "What is the capital of your state?",
            "answerType": "capital",
            "choices": [
                { "state": "CA", "answer": "Sacramento" },
                { "state": "NY", "answer": "Albany" }
            ]
        }
    ],
    "distractors": [
        { "questionNumber": 1, "choices": ["the Bill of Rights", "the Articles of Confederation", "the Federalist Papers"] },
        { "questionNumber": 44, "choices": ["Los Angeles", "San Francisco", "San Diego"] }
    ]
}"#;

#[tokio::test]
async fn finished_session_snapshot_round_trips() {
    let repo = InMemoryRepository::new();
    let bank = load_question_bank(BANK).unwrap();
    let settings = GameSettings::new(2, 2, "CA", None).unwrap();
    repo.save_settings(&settings).await.unwrap();

    let loaded = repo.load_settings().await.unwrap().expect("settings saved");
    let history = repo.load_history().await.unwrap();
    let start = create_session(
        &bank,
        NewSession {
            id: civics_core::model::SessionId::generate(),
            settings: &loaded,
            prior_history: &history,
            started_at: fixed_now(),
        },
        &mut RngSource::seeded(12),
    )
    .unwrap();

    let mut session = start.session.clone();
    for (i, question) in start.served.iter().enumerate() {
        let timestamp = fixed_now() + Duration::seconds(i64::try_from(i).unwrap() + 1);
        session = submit_answer(
            &session,
            question,
            &SubmittedAnswer {
                question_id: question.id(),
                selection: question.correct().clone(),
                timestamp,
            },
        )
        .unwrap();
        repo.save_history(session.history()).await.unwrap();
    }

    let result = result_of(&session).unwrap();
    assert!(result.is_early_win());
    assert_eq!(repo.append_result(&result).await.unwrap(), 0);
    assert_eq!(repo.list_results().await.unwrap(), vec![result]);

    let stored = repo.load_history().await.unwrap();
    assert_eq!(stored.len(), 2);
    let capital = PairedQuestionId::answer(QuestionNumber::new(44), 0);
    assert!(stored.get(capital).unwrap().records()[0].correct);
}

#[tokio::test]
async fn storage_aggregate_shares_one_backend() {
    let storage = Storage::in_memory();
    let id = PairedQuestionId::answer(QuestionNumber::new(1), 0);
    let history = HistoryMap::new().with_answer(id, AnswerRecord::new(fixed_now(), false));

    storage.history.save_history(&history).await.unwrap();
    assert_eq!(storage.history.load_history().await.unwrap(), history);
    assert!(storage.results.list_results().await.unwrap().is_empty());
    assert!(storage.settings.load_settings().await.unwrap().is_none());
}
