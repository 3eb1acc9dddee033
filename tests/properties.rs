//! Property tests: routing terminates and never lands on a hidden or answered question.
mod common;
use common::*;
use proptest::prelude::*;
use serde_json::json;
use shindan::prelude::*;

/// (kind, target) per answer: 0 = next question, 1 = bucket, 2 = unrouted, 3 = junk.
type AnswerSpec = (u8, usize);
/// Optional (parent question, parent answer) visibility condition.
type QuestionSpec = (Option<(usize, usize)>, Vec<AnswerSpec>);

fn build_graph(specs: &[QuestionSpec]) -> QuestionGraph {
    let n = specs.len();
    let mut questions = Vec::new();
    let mut answers = Vec::new();
    for (index, (condition, answer_specs)) in specs.iter().enumerate() {
        let id = format!("q{}", index);
        questions.push(match condition {
            Some((parent, answer)) => conditional(
                &id,
                index as i32,
                &format!("q{}", parent % n),
                &format!("q{}-a{}", parent % n, answer),
            ),
            None => question(&id, index as i32),
        });
        for (a, (kind, target)) in answer_specs.iter().enumerate() {
            let value = match kind {
                0 => next(&format!("q{}", target % (n + 1))),
                1 => bucket("done"),
                2 => json!({}),
                _ => json!("junk"),
            };
            answers.push(answer(&format!("{}-a{}", id, a), &id, a as i32, value));
        }
    }
    QuestionGraph::builder(questions, answers).build().unwrap()
}

fn question_spec() -> impl Strategy<Value = QuestionSpec> {
    (
        prop::option::weighted(0.3, (0usize..8, 0usize..3)),
        prop::collection::vec((0u8..4, 0usize..10), 1..4),
    )
}

proptest! {
    #[test]
    fn routing_terminates_on_visible_unanswered_questions(
        specs in prop::collection::vec(question_spec(), 1..8),
        picks in prop::collection::vec(0usize..3, 8),
    ) {
        let graph = build_graph(&specs);
        let mut answers = AnswerMap::new();
        let mut current = graph.entry_question().id.clone();
        let mut steps = 0;

        loop {
            steps += 1;
            prop_assert!(steps <= graph.len(), "run exceeded {} selections", graph.len());

            let options = graph.answers_for(&current);
            let selected = options[picks[steps - 1] % options.len()].id.clone();
            answers.insert(current.clone(), selected.clone());

            let resolution = resolve_next(&current, &selected, &answers, &graph);
            match resolution.route {
                Route::Question(next) => {
                    prop_assert!(!answers.contains_key(&next));
                    let question = graph.question(&next).unwrap();
                    prop_assert!(is_visible(question, &answers));
                    prop_assert!(!graph.answers_for(&next).is_empty());
                    current = next;
                }
                Route::Bucket(_) | Route::End => break,
            }
        }
    }
}
