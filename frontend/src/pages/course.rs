use yew::prelude::*;

use crate::api::client::HttpClient;
use crate::api::models::{Course, Lesson};
use crate::api::traits::CourseApi;
use crate::components::providers::use_language;
use crate::state::quiz::{QuizResult, QuizState};
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};

/// Marker class for a quiz choice once its question has been graded.
fn choice_mark(outcome: Option<bool>, is_correct: bool, is_selected: bool) -> Option<&'static str> {
    match outcome {
        Some(_) if is_correct => Some("correct"),
        Some(false) if is_selected => Some("wrong"),
        _ => None,
    }
}

#[derive(Properties, PartialEq)]
pub struct CoursePageProps {
    pub slug: String,
}

#[function_component]
pub fn CoursePage(props: &CoursePageProps) -> Html {
    let lang = use_language();
    let token = use_cancel_token();
    let course = use_state(|| None::<Result<Course, String>>);
    let selected = use_state(|| 0usize);

    {
        let course = course.clone();
        let selected = selected.clone();
        use_effect_with_deps(
            move |slug: &String| {
                let slug = slug.clone();
                spawn_cancellable(
                    &token,
                    async move { HttpClient::stored().fetch_course(&slug).await },
                    move |result| {
                        selected.set(0);
                        course.set(Some(result.map_err(|e| {
                            log::error!("Failed to load course: {}", e);
                            e.to_string()
                        })));
                    },
                );
                || ()
            },
            props.slug.clone(),
        );
    }

    let course = match (*course).as_ref() {
        None => return html! { <div class="course-page"><p class="muted">{lang.t("common.loading")}</p></div> },
        Some(Err(message)) => return html! { <div class="course-page"><p class="form-error">{message.clone()}</p></div> },
        Some(Ok(course)) => course.clone(),
    };

    let lesson = course.lessons.get(*selected).cloned();

    html! {
        <div class="course-page">
            <style>
            {r#".course-page {
                display: grid;
                grid-template-columns: 260px 1fr;
                gap: 2rem;
                max-width: 1100px;
                margin: 0 auto;
                padding: 6rem 2rem 2rem;
            }
            .lesson-list button {
                display: block;
                width: 100%;
                text-align: left;
                padding: 0.6rem 0.8rem;
                margin-bottom: 0.3rem;
                border-radius: 8px;
            }
            .lesson-list button.current { background: var(--accent); color: #fff; }
            .quiz-question { margin: 1.5rem 0; }
            .quiz-choice.correct { color: #2e8b57; }
            .quiz-choice.wrong { color: #b22222; }
            @media (max-width: 768px) {
                .course-page { grid-template-columns: 1fr; }
            }"#}
            </style>
            <aside class="lesson-list">
                <h2>{course.title.clone()}</h2>
                { for course.lessons.iter().enumerate().map(|(i, l)| {
                    let is_current = i == *selected;
                    let onclick = {
                        let selected = selected.clone();
                        Callback::from(move |_: MouseEvent| selected.set(i))
                    };
                    html! {
                        <button key={l.id} class={classes!(is_current.then(|| "current"))} {onclick}>
                            {format!("{}. {}", i + 1, l.title)}
                        </button>
                    }
                }) }
            </aside>
            <article>
                {
                    match lesson {
                        Some(lesson) => {
                            let id = lesson.id;
                            html! { <LessonView key={id} {lesson} /> }
                        }
                        None => html! { <p class="muted">{"This course has no lessons yet."}</p> },
                    }
                }
            </article>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct LessonViewProps {
    lesson: Lesson,
}

#[function_component]
fn LessonView(props: &LessonViewProps) -> Html {
    let lang = use_language();
    let quiz = use_state(QuizState::default);
    let result = use_state(|| None::<QuizResult>);
    let questions = props.lesson.quiz.clone();

    let submit = {
        let quiz = quiz.clone();
        let result = result.clone();
        let questions = questions.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*quiz).clone();
            if let Some(graded) = next.submit(&questions) {
                log::info!("Quiz graded: {}/{}", graded.correct, graded.total);
                result.set(Some(graded));
                quiz.set(next);
            }
        })
    };

    let retry = {
        let quiz = quiz.clone();
        let result = result.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*quiz).clone();
            next.reset();
            quiz.set(next);
            result.set(None);
        })
    };

    let render_question = |question: &crate::api::models::QuizQuestion| {
        let outcome = (*result).as_ref().and_then(|r| r.per_question.get(&question.id).copied());
        html! {
            <div class="quiz-question" key={question.id}>
                <p><strong>{question.prompt.clone()}</strong></p>
                { for question.choices.iter().enumerate().map(|(i, choice)| {
                    let is_selected = quiz.selected(question.id) == Some(i);
                    let submitted = quiz.is_submitted();
                    let onchange = {
                        let quiz = quiz.clone();
                        let q = question.clone();
                        Callback::from(move |_: Event| {
                            let mut next = (*quiz).clone();
                            next.select(&q, i);
                            quiz.set(next);
                        })
                    };
                    let class = classes!("quiz-choice", choice_mark(outcome, i == question.correct_index, is_selected));
                    html! {
                        <label {class}>
                            <input
                                type="radio"
                                name={format!("q-{}", question.id)}
                                checked={is_selected}
                                disabled={submitted}
                                {onchange}
                            />
                            {choice.clone()}
                        </label>
                    }
                }) }
            </div>
        }
    };

    let summary = match (*result).as_ref() {
        Some(r) => html! {
            <div class={classes!("quiz-result", if r.passed() { "passed" } else { "failed" })}>
                {format!("{}/{} ({}%) {}", r.correct, r.total, r.percent(), if r.passed() { "Passed" } else { "Not passed yet" })}
                <button class="editable-btn" onclick={retry}>{lang.t("quiz.retry")}</button>
            </div>
        },
        None => html! {
            <button class="primary-button" disabled={!quiz.all_answered(&questions)} onclick={submit}>
                {lang.t("quiz.submit")}
            </button>
        },
    };

    html! {
        <>
            <h1>{props.lesson.title.clone()}</h1>
            <div class="lesson-body">
                { for props.lesson.body.split("\n\n").map(|p| html! { <p>{p.to_string()}</p> }) }
            </div>
            if !questions.is_empty() {
                <section class="quiz">
                    <h2>{"Quiz"}</h2>
                    { for questions.iter().map(render_question) }
                    {summary}
                </section>
            }
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ungraded_choices_carry_no_mark() {
        assert_eq!(choice_mark(None, true, true), None);
        assert_eq!(choice_mark(None, false, true), None);
    }

    #[test]
    fn graded_choices_mark_the_answer_and_a_wrong_pick() {
        assert_eq!(choice_mark(Some(false), true, false), Some("correct"));
        assert_eq!(choice_mark(Some(false), false, true), Some("wrong"));
        assert_eq!(choice_mark(Some(false), false, false), None);
        assert_eq!(choice_mark(Some(true), true, true), Some("correct"));
    }
}
