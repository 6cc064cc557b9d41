//! 汎用の編集可能テーブル
//!
//! 行の表示・編集欄・検証は [`RowConfig`] で、追加/更新/削除の反映先は
//! [`RowCommands`] で外から与える。テーブル自身が持つ状態は
//! 「どの行を編集中か」とそのドラフトだけ。

use leptos::*;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

use crate::components::OptionalInput;
use crate::utils::log_trace::{log_info, log_warn};

const NOTICE_MS: u32 = 2000;

/// 編集行の入力欄1つ分
pub struct EditControl<D> {
    pub label: &'static str,
    pub kind: ControlKind<D>,
}

pub enum ControlKind<D> {
    /// 自由入力のテキスト欄
    Text {
        name: &'static str,
        value: String,
        apply: Rc<dyn Fn(&mut D, String)>,
    },
    /// 任意入力の数値欄（None = 未入力, Some(None) = 上限なし）
    OptionalNumber {
        value: Option<Option<u32>>,
        apply: Rc<dyn Fn(&mut D, Option<Option<u32>>)>,
    },
}

/// 行の型ごとの表示・編集・検証
pub trait RowConfig: Clone + 'static {
    type Row: Clone + 'static;
    type Key: Clone + PartialEq + 'static;
    type Draft: Clone + 'static;
    type Error: Display;

    /// 行の同一性（編集中の行の追跡に使う）
    fn row_key(&self, row: &Self::Row) -> Self::Key;

    /// 新規行のドラフト
    fn new_draft(&self) -> Self::Draft;
    /// 既存行を編集するときのドラフト
    fn to_draft(&self, row: &Self::Row) -> Self::Draft;
    /// 表示用セル（列順）
    fn display_row(&self, row: &Self::Row) -> Vec<String>;
    /// 編集用の入力欄（列順）
    fn edit_row(&self, draft: &Self::Draft) -> Vec<EditControl<Self::Draft>>;
    /// ドラフトを確定できるか判定し、できれば行に変換
    fn validate(&self, draft: &Self::Draft) -> Result<Self::Row, Self::Error>;
}

/// 確定した行の反映先
pub trait RowCommands<T> {
    fn add(&self, row: T);
    fn update(&self, row: T);
    fn remove(&self, row: T);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode<K> {
    Idle,
    Adding,
    /// 行キーで編集中の行を指す（行番号は外部の一覧が変わるとずれる）
    Editing(K),
}

impl<K> Default for EditMode<K> {
    fn default() -> Self {
        EditMode::Idle
    }
}

impl<K: PartialEq> EditMode<K> {
    pub fn is_editing(&self, key: &K) -> bool {
        matches!(self, EditMode::Editing(k) if k == key)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Commit<T> {
    Add(T),
    Update(T),
}

/// 編集セッション（モード + ドラフト）
#[derive(Debug, Clone, PartialEq)]
pub struct TableEditor<K, D> {
    mode: EditMode<K>,
    draft: Option<D>,
}

impl<K, D> Default for TableEditor<K, D> {
    fn default() -> Self {
        TableEditor {
            mode: EditMode::Idle,
            draft: None,
        }
    }
}

impl<K, D> TableEditor<K, D> {
    pub fn mode(&self) -> &EditMode<K> {
        &self.mode
    }

    pub fn draft(&self) -> Option<&D> {
        self.draft.as_ref()
    }

    pub fn begin_add(&mut self, draft: D) {
        self.mode = EditMode::Adding;
        self.draft = Some(draft);
    }

    pub fn begin_edit(&mut self, key: K, draft: D) {
        self.mode = EditMode::Editing(key);
        self.draft = Some(draft);
    }

    pub fn edit(&mut self, f: impl FnOnce(&mut D)) {
        if let Some(draft) = self.draft.as_mut() {
            f(draft);
        }
    }

    pub fn cancel(&mut self) {
        *self = TableEditor::default();
    }

    /// 確定できない理由。編集していないとき・確定できるときは None
    pub fn problem<R>(&self, config: &R) -> Option<String>
    where
        R: RowConfig<Key = K, Draft = D>,
    {
        let draft = self.draft.as_ref()?;
        config.validate(draft).err().map(|err| err.to_string())
    }

    /// ドラフトが有効なら確定して Idle に戻る。無効ならそのまま編集を続ける
    pub fn submit<R>(&mut self, config: &R) -> Option<Commit<R::Row>>
    where
        R: RowConfig<Key = K, Draft = D>,
    {
        let row = config.validate(self.draft.as_ref()?).ok()?;
        let commit = match self.mode {
            EditMode::Idle => return None,
            EditMode::Adding => Commit::Add(row),
            EditMode::Editing(_) => Commit::Update(row),
        };
        self.cancel();
        Some(commit)
    }
}

/// 一時表示のお知らせ。連番が一致するときだけ消す
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    seq: u64,
    message: Option<String>,
}

impl Notice {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// 表示して、後で消すときの連番を返す
    pub fn post(&mut self, message: String) -> u64 {
        self.seq += 1;
        self.message = Some(message);
        self.seq
    }

    pub fn expire(&mut self, seq: u64) {
        if self.seq == seq {
            self.message = None;
        }
    }
}

fn render_control<K: 'static, D: 'static>(
    control: EditControl<D>,
    set_editor: WriteSignal<TableEditor<K, D>>,
) -> View {
    let EditControl { label, kind } = control;
    match kind {
        ControlKind::Text { name, value, apply } => view! {
            <input type="text" class="text-input"
                name=name
                aria-label=label
                value=value
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    set_editor.update(|e| e.edit(|d| apply(d, value)));
                }
            />
        }
        .into_view(),
        ControlKind::OptionalNumber { value, apply } => view! {
            <OptionalInput
                label=label
                initial=value
                on_change=move |v| set_editor.update(|e| e.edit(|d| apply(d, v)))
            />
        }
        .into_view(),
    }
}

/// 編集可能テーブルコンポーネント
#[component]
pub fn DataTable<R, C>(
    title: &'static str,
    column_titles: Vec<&'static str>,
    #[prop(into)] rows: Signal<Vec<R::Row>>,
    config: R,
    commands: C,
) -> impl IntoView
where
    R: RowConfig,
    C: RowCommands<R::Row> + Clone + 'static,
{
    let (editor, set_editor) = create_signal(TableEditor::<R::Key, R::Draft>::default());
    let (notice, set_notice) = create_signal(Notice::default());

    // 入力のたびに描画し直さないよう、モードだけを購読する
    let mode = create_memo(move |_| editor.with(|e| e.mode().clone()));

    // 確定できない理由（確定可能なら None）
    let problem = {
        let config = config.clone();
        create_memo(move |_| editor.with(|e| e.problem(&config)))
    };

    let flash = move |message: String| {
        let mut seq = 0;
        set_notice.update(|n| seq = n.post(message));
        spawn_local(async move {
            gloo::timers::future::TimeoutFuture::new(NOTICE_MS).await;
            set_notice.update(|n| n.expire(seq));
        });
    };

    let begin_add = {
        let config = config.clone();
        move |_| {
            set_editor.update(|e| e.begin_add(config.new_draft()));
            log_info("data-table", &format!("{}: 新規行の入力を開始", title));
        }
    };

    let submit = {
        let config = config.clone();
        let commands = commands.clone();
        move |_| {
            let mut commit = None;
            set_editor.update(|e| commit = e.submit(&config));
            match commit {
                Some(Commit::Add(row)) => {
                    commands.add(row);
                    log_info("data-table", &format!("{}: 行を追加", title));
                    flash("Added".to_string());
                }
                Some(Commit::Update(row)) => {
                    commands.update(row);
                    log_info("data-table", &format!("{}: 行を更新", title));
                    flash("Saved".to_string());
                }
                None => log_warn("data-table", &format!("{}: 入力が不完全なため確定できません", title)),
            }
        }
    };

    let cancel = move |_| set_editor.update(|e| e.cancel());

    // 編集行（新規・既存共通）
    let edit_row = {
        let config = config.clone();
        move || -> View {
            let Some(draft) = editor.with_untracked(|e| e.draft().cloned()) else {
                return ().into_view();
            };
            let submit = submit.clone();
            view! {
                <tr class="editing">
                    {config.edit_row(&draft).into_iter().map(|control| view! {
                        <td>{render_control(control, set_editor)}</td>
                    }).collect_view()}
                    <td class="row-actions">
                        <button class="save-btn"
                            disabled=move || problem.get().is_some()
                            title=move || problem.get().unwrap_or_default()
                            on:click=submit
                        >"Save"</button>
                        <button class="cancel-btn" on:click=cancel>"Cancel"</button>
                    </td>
                </tr>
            }
            .into_view()
        }
    };

    let body = move || {
        let current = mode.get();
        let adding = (current == EditMode::Adding).then(&edit_row);
        let existing = rows
            .get()
            .into_iter()
            .map(|row| {
                let key = config.row_key(&row);
                if current.is_editing(&key) {
                    return edit_row();
                }
                let cells = config.display_row(&row);
                let begin_edit = {
                    let config = config.clone();
                    let row = row.clone();
                    move |_| set_editor.update(|e| e.begin_edit(key.clone(), config.to_draft(&row)))
                };
                // 一覧からの削除は外部の状態管理が反映する
                let remove = {
                    let commands = commands.clone();
                    move |_| {
                        commands.remove(row.clone());
                        log_info("data-table", &format!("{}: 行を削除", title));
                        flash("Removed".to_string());
                    }
                };
                view! {
                    <tr>
                        {cells.into_iter().map(|cell| view! {
                            <td><span class="cell-text">{cell}</span></td>
                        }).collect_view()}
                        <td class="row-actions">
                            <button class="edit-btn" on:click=begin_edit>"Edit"</button>
                            <button class="delete-btn" on:click=remove>"Delete"</button>
                        </td>
                    </tr>
                }
                .into_view()
            })
            .collect_view();
        adding.into_iter().chain(std::iter::once(existing)).collect_view()
    };

    view! {
        <div class="data-table">
            <div class="table-header">
                <h2>{title}</h2>
                <button class="add-btn"
                    disabled=move || mode.get() == EditMode::Adding
                    on:click=begin_add
                >"Add"</button>
            </div>
            {move || notice.with(|n| n.message().map(|m| m.to_string())).map(|m| view! {
                <div class="table-notice">{m}</div>
            })}
            <table>
                <thead>
                    <tr>
                        {column_titles.into_iter().map(|t| view! { <th>{t}</th> }).collect_view()}
                        <th></th>
                    </tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 名前だけの行（名前が行キー、空文字は確定不可）
    #[derive(Clone)]
    struct NameOnly;

    impl RowConfig for NameOnly {
        type Row = String;
        type Key = String;
        type Draft = String;
        type Error = &'static str;

        fn row_key(&self, row: &String) -> String {
            row.clone()
        }

        fn new_draft(&self) -> String {
            String::new()
        }

        fn to_draft(&self, row: &String) -> String {
            row.clone()
        }

        fn display_row(&self, row: &String) -> Vec<String> {
            vec![row.clone()]
        }

        fn edit_row(&self, draft: &String) -> Vec<EditControl<String>> {
            vec![EditControl {
                label: "Name",
                kind: ControlKind::Text {
                    name: "name",
                    value: draft.clone(),
                    apply: Rc::new(|d, v| *d = v),
                },
            }]
        }

        fn validate(&self, draft: &String) -> Result<String, &'static str> {
            if draft.is_empty() {
                Err("empty")
            } else {
                Ok(draft.clone())
            }
        }
    }

    type Editor = TableEditor<String, String>;

    fn type_name(editor: &mut Editor, text: &str) {
        let controls = NameOnly.edit_row(editor.draft().unwrap());
        match &controls[0].kind {
            ControlKind::Text { apply, .. } => editor.edit(|d| apply(d, text.to_string())),
            ControlKind::OptionalNumber { .. } => panic!("expected text control"),
        }
    }

    /// 描画時に編集行として扱われる行
    fn editing_rows(editor: &Editor, rows: &[&str]) -> Vec<String> {
        rows.iter()
            .map(|r| r.to_string())
            .filter(|r| editor.mode().is_editing(&NameOnly.row_key(r)))
            .collect()
    }

    fn rows(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_starts_idle() {
        let editor = Editor::default();
        assert_eq!(editor.mode(), &EditMode::Idle);
        assert!(editor.draft().is_none());
    }

    #[test]
    fn test_add_flow() {
        let mut editor = Editor::default();
        editor.begin_add(NameOnly.new_draft());
        assert_eq!(editor.mode(), &EditMode::Adding);

        // 空のままでは確定できず、編集が続く
        assert_eq!(editor.submit(&NameOnly), None);
        assert_eq!(editor.mode(), &EditMode::Adding);

        type_name(&mut editor, "Evening");
        assert_eq!(editor.submit(&NameOnly), Some(Commit::Add("Evening".to_string())));
        assert_eq!(editor.mode(), &EditMode::Idle);
        assert!(editor.draft().is_none());
    }

    #[test]
    fn test_edit_flow_commits_update() {
        let mut editor = Editor::default();
        let row = "Morning".to_string();
        editor.begin_edit(NameOnly.row_key(&row), NameOnly.to_draft(&row));
        assert_eq!(editor.mode(), &EditMode::Editing("Morning".to_string()));

        type_name(&mut editor, "Early morning");
        assert_eq!(
            editor.submit(&NameOnly),
            Some(Commit::Update("Early morning".to_string()))
        );
        assert_eq!(editor.mode(), &EditMode::Idle);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut editor = Editor::default();
        editor.begin_add("draft".to_string());
        editor.cancel();
        assert_eq!(editor, Editor::default());
        assert_eq!(editor.submit(&NameOnly), None);
    }

    #[test]
    fn test_new_session_replaces_previous() {
        let mut editor = Editor::default();
        editor.begin_add("new".to_string());
        editor.begin_edit("A".to_string(), "existing".to_string());
        assert_eq!(editor.mode(), &EditMode::Editing("A".to_string()));
        assert_eq!(editor.draft().map(String::as_str), Some("existing"));
    }

    #[test]
    fn test_editing_row_follows_key_before_remove_is_applied() {
        let mut editor = Editor::default();
        editor.begin_edit("C".to_string(), "C".to_string());

        // 削除ボタンを押した直後、外部の一覧はまだ変わっていない
        assert_eq!(editing_rows(&editor, &["A", "B", "C"]), rows(&["C"]));

        // 削除が反映された後も同じ行を編集している
        assert_eq!(editing_rows(&editor, &["B", "C"]), rows(&["C"]));
        assert_eq!(editor.draft().map(String::as_str), Some("C"));
    }

    #[test]
    fn test_editing_row_gone_from_list_renders_nothing() {
        let mut editor = Editor::default();
        editor.begin_edit("B".to_string(), "B".to_string());
        assert!(editing_rows(&editor, &["A", "C"]).is_empty());
    }

    #[test]
    fn test_problem_gates_save() {
        let mut editor = Editor::default();
        assert_eq!(editor.problem(&NameOnly), None);

        editor.begin_add(NameOnly.new_draft());
        assert_eq!(editor.problem(&NameOnly), Some("empty".to_string()));

        type_name(&mut editor, "Night");
        assert_eq!(editor.problem(&NameOnly), None);
    }

    #[test]
    fn test_notice_expires_only_its_own_message() {
        let mut notice = Notice::default();
        let first = notice.post("Added".to_string());
        let second = notice.post("Saved".to_string());

        // 先の通知のタイマーでは後の通知は消えない
        notice.expire(first);
        assert_eq!(notice.message(), Some("Saved"));

        notice.expire(second);
        assert_eq!(notice.message(), None);
    }
}
