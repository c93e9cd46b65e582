use crate::storage::LocalScoreStore;
use crate::utils::*;
use bitflags::bitflags;
use clap::Args;
use gloo::timers::callback::Interval;
use neonsweep_core as engine;
use neonsweep_core::{CellView, Coord, Difficulty, GameSession, GameStatus, Pos};
use serde::{Deserialize, Serialize};
use yew::html::Scope;
use yew::prelude::*;

/// What the primary gesture does. Secondary always toggles a flag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum InputMode {
    #[default]
    Scan,
    Flag,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Gesture {
    Primary,
    Secondary,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Reveal,
    ToggleFlag,
}

impl InputMode {
    pub(crate) const fn action(self, gesture: Gesture) -> Action {
        match (self, gesture) {
            (InputMode::Scan, Gesture::Primary) => Action::Reveal,
            (InputMode::Flag, Gesture::Primary) => Action::ToggleFlag,
            (_, Gesture::Secondary) => Action::ToggleFlag,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub difficulty: Difficulty,
    pub input_mode: InputMode,
}

impl StorageKey for Settings {
    const KEY: &'static str = "neonsweep:settings";
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CellPointerState {
    pos: Pos,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    /// Buttons held over a cell, for the pressed highlight.
    Press(CellPointerState),
    /// `click` or `contextmenu`, which also fire for touch taps and long presses.
    Gesture(Pos, Gesture),
    Leave,
}

/// Updates the held-pointer state for `msg`. Returns whether the highlight changed and the
/// gesture to apply, if any.
pub(crate) fn track_pointer(
    held: &mut Option<CellPointerState>,
    msg: CellMsg,
) -> (bool, Option<(Pos, Gesture)>) {
    match msg {
        CellMsg::Press(state) => (held.replace(state) != Some(state), None),
        CellMsg::Gesture(pos, gesture) => (held.take().is_some(), Some((pos, gesture))),
        CellMsg::Leave => (held.take().is_some(), None),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    /// One second passed for the session with this generation.
    Tick(u32),
    NewGame,
    SelectDifficulty(String),
    SetInputMode(InputMode),
}

/// Neon colour class for a revealed count, cycling cyan, green, red.
pub(crate) fn neon_class(count: u8) -> Option<&'static str> {
    const NEON: [&str; 3] = ["neon-cyan", "neon-green", "neon-red"];
    (count > 0).then(|| NEON[usize::from(count) % NEON.len()])
}

pub(crate) fn cell_classes(cell: CellView) -> Classes {
    let mut class = classes!("cell");
    if cell.mine {
        class.push(classes!("revealed", "mine"));
        if cell.triggered {
            class.push("oops");
        }
        if cell.flagged {
            class.push("flagged");
        }
    } else if cell.revealed {
        class.push(classes!(
            "revealed",
            format!("num-{}", cell.adjacent),
            neon_class(cell.adjacent)
        ));
    } else if cell.flagged {
        class.push("flagged");
    }
    class
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: Coord,
    col: Coord,
    cell: CellView,
    #[prop_or_default]
    pressed: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellTile)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        row,
        col,
        cell,
        pressed,
        callback,
    } = props.clone();

    let mut class = cell_classes(cell);
    if pressed {
        class.push("pressed");
    }
    let label = if cell.revealed && !cell.mine && cell.adjacent > 0 {
        cell.adjacent.to_string()
    } else {
        String::new()
    };

    let pos = (row, col);
    let onmousedown = callback.reform(move |e: MouseEvent| {
        let buttons = MouseButtons::from_bits_truncate(e.buttons());
        log::trace!("{:?} pointer {:?}", pos, buttons);
        CellMsg::Press(CellPointerState { pos, buttons })
    });
    let onclick = callback.reform(move |_: MouseEvent| CellMsg::Gesture(pos, Gesture::Primary));
    let oncontextmenu = callback.reform(move |e: MouseEvent| {
        e.prevent_default();
        CellMsg::Gesture(pos, Gesture::Secondary)
    });
    let onmouseleave = callback.reform(|_: MouseEvent| CellMsg::Leave);

    html! {
        <td {class} {onmousedown} {onclick} {oncontextmenu} {onmouseleave}>{label}</td>
    }
}

/// Projects the board into table rows.
struct GridRenderer<'a> {
    cols: Coord,
    pressed: Option<Pos>,
    callback: &'a Callback<CellMsg>,
    row: Vec<Html>,
    rows: Vec<Html>,
}

impl<'a> GridRenderer<'a> {
    fn new(cols: Coord, pressed: Option<Pos>, callback: &'a Callback<CellMsg>) -> Self {
        Self {
            cols,
            pressed,
            callback,
            row: Vec::with_capacity(cols.into()),
            rows: Vec::new(),
        }
    }

    fn finish(self) -> Html {
        html! { <>{ for self.rows }</> }
    }
}

impl engine::Renderer for GridRenderer<'_> {
    fn paint(&mut self, (row, col): Pos, cell: CellView) {
        let pressed = self.pressed == Some((row, col)) && cell.is_hidden();
        let callback = self.callback.clone();
        self.row.push(html! {
            <CellTile {row} {col} {cell} {pressed} {callback}/>
        });

        if col + 1 == self.cols {
            let cells = std::mem::take(&mut self.row);
            self.rows.push(html! { <tr>{ for cells }</tr> });
        }
    }
}

/// Starts one-second intervals tagged with the session generation.
struct IntervalTimers {
    link: Scope<GameView>,
    generation: u32,
}

impl engine::TimerSource for IntervalTimers {
    type Handle = Interval;

    fn start(&mut self) -> Interval {
        let link = self.link.clone();
        let generation = self.generation;
        Interval::new(1_000, move || link.send_message(Msg::Tick(generation)))
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    #[prop_or_default]
    seed: Option<u64>,

    /// Start with this difficulty (easy, medium, hard)
    #[arg(short, long)]
    #[prop_or_default]
    difficulty: Option<String>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: Settings,
    session: GameSession<Interval>,
    generation: u32,
    scores: LocalScoreStore,
    best: Option<u32>,
    forced_seed: Option<u64>,
    current_cell_state: Option<CellPointerState>,
}

impl GameView {
    fn new_game(&mut self) {
        // the old timer must be gone before the next board exists
        self.session.cancel_timer();
        self.generation = self.generation.wrapping_add(1);

        let seed = self.forced_seed.unwrap_or_else(js_random_seed);
        self.session = GameSession::new(self.settings.difficulty.clone(), seed);
        self.best = self.session.best_time(&self.scores);
        self.current_cell_state = None;
    }

    fn apply(&mut self, ctx: &Context<Self>, pos: Pos, gesture: Gesture) -> bool {
        match self.settings.input_mode.action(gesture) {
            Action::ToggleFlag => self.session.toggle_flag(pos).has_update(),
            Action::Reveal => {
                let mut timers = IntervalTimers {
                    link: ctx.link().clone(),
                    generation: self.generation,
                };
                let outcome = self.session.reveal(pos, &mut timers, &mut self.scores);
                if outcome.is_terminal() {
                    self.best = self.session.best_time(&self.scores);
                }
                outcome.has_update()
            }
        }
    }

    fn on_cell_event(&mut self, ctx: &Context<Self>, msg: CellMsg) -> bool {
        let (highlight_changed, gesture) = track_pointer(&mut self.current_cell_state, msg);
        match gesture {
            Some((pos, gesture)) => {
                log::debug!("{:?} on {:?}", gesture, pos);
                self.apply(ctx, pos, gesture) || highlight_changed
            }
            None => highlight_changed,
        }
    }

    fn pressed_cell(&self) -> Option<Pos> {
        match self.current_cell_state {
            Some(CellPointerState {
                pos,
                buttons: MouseButtons::LEFT,
            }) if self.settings.input_mode == InputMode::Scan => Some(pos),
            _ => None,
        }
    }

    fn status_class(&self) -> &'static str {
        match self.session.status() {
            GameStatus::NotStarted => "not-started",
            GameStatus::Running => "in-progress",
            GameStatus::Won => "win",
            GameStatus::Lost => "lose",
        }
    }

    fn view_result(&self, ctx: &Context<Self>) -> Html {
        let (title, class) = match self.session.status() {
            GameStatus::Won => ("ACCESS GRANTED", "win-text"),
            GameStatus::Lost => ("SYSTEM FAILURE", "lose-text"),
            _ => return html! {},
        };
        let cb_retry = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        html! {
            <Modal>
                <dialog id="modal-screen" class="active" open={true}>
                    <article>
                        <h2 {class}>{title}</h2>
                        <p>{format!("TIME {}", format_seconds_for_counter(self.session.elapsed_secs()))}</p>
                        <footer>
                            <button onclick={cb_retry}>{"RETRY"}</button>
                        </footer>
                    </article>
                </dialog>
            </Modal>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mut settings: Settings = LocalOrDefault::local_or_default();
        if let Some(label) = props.difficulty.as_deref() {
            match Difficulty::from_label(label) {
                Some(difficulty) => settings.difficulty = difficulty,
                None => log::warn!("Unknown difficulty {:?}, keeping {}", label, settings.difficulty.label()),
            }
        }

        let seed = props.seed.unwrap_or_else(js_random_seed);
        let scores = LocalScoreStore;
        let session = GameSession::new(settings.difficulty.clone(), seed);
        let best = session.best_time(&scores);

        Self {
            settings,
            session,
            generation: 0,
            scores,
            best,
            forced_seed: props.seed,
            current_cell_state: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::CellEvent(cell_msg) => self.on_cell_event(ctx, cell_msg),
            Msg::Tick(generation) if generation == self.generation => self.session.tick(),
            Msg::Tick(generation) => {
                log::trace!("Dropping tick from stale session {}", generation);
                false
            }
            Msg::NewGame => {
                self.new_game();
                true
            }
            Msg::SelectDifficulty(label) => match Difficulty::from_label(&label) {
                Some(difficulty) => {
                    self.settings.difficulty = difficulty;
                    self.settings.local_save();
                    self.new_game();
                    true
                }
                None => {
                    log::warn!("Unknown difficulty {:?}", label);
                    false
                }
            },
            Msg::SetInputMode(mode) => {
                if self.settings.input_mode == mode {
                    return false;
                }
                self.settings.input_mode = mode;
                self.settings.local_save();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (_, cols) = self.session.board().size();
        let active_label = self.session.difficulty().label().to_string();
        let mines_left = format_for_counter(self.session.mines_remaining());
        let elapsed_time = format_seconds_for_counter(self.session.elapsed_secs());
        let best = self
            .best
            .map_or_else(|| "--".to_string(), |secs| secs.to_string());

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });
        let cb_difficulty = ctx.link().callback(|e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            Msg::SelectDifficulty(select.value())
        });
        let cb_scan = ctx.link().callback(|_: MouseEvent| Msg::SetInputMode(InputMode::Scan));
        let cb_flag = ctx.link().callback(|_: MouseEvent| Msg::SetInputMode(InputMode::Flag));
        let mode_class = |mode: InputMode| (self.settings.input_mode == mode).then_some("active");

        let cell_callback = ctx.link().callback(Msg::CellEvent);
        let mut grid = GridRenderer::new(cols, self.pressed_cell(), &cell_callback);
        self.session.render(&mut grid);
        let playable = (!self.session.status().is_finished()).then_some("playable");

        html! {
            <div class="neonsweep" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <select id="difficulty" onchange={cb_difficulty}>
                        {
                            for Difficulty::PRESETS.iter().map(|preset| {
                                let label = preset.label().to_string();
                                let selected = label == active_label;
                                html! { <option value={label.clone()} {selected}>{label.to_uppercase()}</option> }
                            })
                        }
                    </select>
                    <span id="mode">
                        <button id="mode-scan" class={classes!(mode_class(InputMode::Scan))} onclick={cb_scan}>{"SCAN"}</button>
                        <button id="mode-flag" class={classes!(mode_class(InputMode::Flag))} onclick={cb_flag}>{"FLAG"}</button>
                    </span>
                </nav>
                <header>
                    <aside id="mine-count">{mines_left}</aside>
                    <button id="reset-btn" class={self.status_class()} onclick={cb_new_game}/>
                    <aside id="timer">{elapsed_time}</aside>
                </header>
                <small>{"BEST "}<span id="best-score">{best}</span></small>
                <table id="grid" class={classes!(playable)}>
                    { grid.finish() }
                </table>
                { self.view_result(ctx) }
            </div>
        }
    }
}
