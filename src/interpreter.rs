use crate::bag::Bag;
use crate::config::EngineConfig;
use crate::frontend::{Frontend, TalkPosition};
use crate::instruction::Instruction;
use crate::random::EngineRand;
use crate::savedata::SaveData;
use crate::script_library::{ScriptLibrary, TalkTable};
use crate::sentinel::Target;
use crate::world::{AnimationJob, World};
use log::{debug, info, warn};
use std::collections::VecDeque;

/// Instructions one run may execute without pausing before it is treated as runaway
pub const MAX_INSTRUCTIONS_PER_RUN: u64 = 100_000;

/// What a paused script is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// A dialog, prompt, battle, fade or shop; resumed by `continue_events`
    Frontend,
    /// A scripted texture animation; resumed by `tick` when it completes
    Animation,
    /// A scripted camera or walking path; resumed by `tick` when it completes
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptState {
    Idle,
    Running,
    Paused(PauseReason),
}

/// Result of executing one opcode or deferred step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpResult {
    /// Keep dispatching
    Continue,
    /// Stop until resumed
    Pause(PauseReason),
    /// Condition decided now; take the matching jump
    Branch(bool),
    /// Condition decided by the frontend; pause and take the jump on resume
    Deferred,
}

/// What `continue_events` applies before dispatching again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resume {
    #[default]
    Nothing,
    /// Jump by the distance matching the supplied result
    Advance { on_true: i16, on_false: i16 },
    /// A lost battle ends the script and drops the remaining steps
    AbortOnLoss,
}

/// Work queued by one opcode and executed before the next opcode is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Talk {
        talk_id: i16,
        head_id: i16,
        style: i16,
    },
    Notice(Vec<String>),
    AddItem {
        item: i16,
        count: i16,
        notify: bool,
    },
    Battle {
        battle_id: i16,
        grants_exp: bool,
        abort_on_loss: bool,
    },
    SetEventTex {
        submap: i16,
        event: i16,
        tex: i16,
    },
    SetBlocked {
        submap: i16,
        event: i16,
        blocked: i16,
    },
    Animate(AnimationJob),
    FadeOut,
    FadeIn,
    ClosePopup,
    Exit,
}

/// Where a script was triggered from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSource {
    /// Event object whose script is running
    pub event: Option<i16>,
    /// Item the player used on it
    pub item: Option<i16>,
}

#[derive(Debug, Default)]
struct RunState {
    script_id: i16,
    ip: usize,
    stream: Vec<i16>,
    source: EventSource,
    pending: Resume,
    deferred: VecDeque<ScriptStep>,
    executed: u64,
}

/// Everything scripts read and mutate
pub struct EngineContext {
    pub config: EngineConfig,
    pub save: SaveData,
    pub bag: Bag,
    pub world: World,
    pub scripts: ScriptLibrary,
    pub talks: TalkTable,
    pub frontend: Box<dyn Frontend>,
    pub rand: EngineRand,
}

impl EngineContext {
    pub fn new(
        config: EngineConfig,
        save: SaveData,
        scripts: ScriptLibrary,
        talks: TalkTable,
        frontend: Box<dyn Frontend>,
    ) -> Self {
        let bag = Bag::from_base(&save.base, save.items.len());
        let world = World::from_base(&save.base);
        let rand = EngineRand::from_seed(config.seed);
        EngineContext {
            config,
            save,
            bag,
            world,
            scripts,
            talks,
            frontend,
            rand,
        }
    }

    /// Load scripts, talk text and a save slot as configured. Slot 0 is a new game and
    /// starts in the configured sub-map.
    pub fn load(
        config: EngineConfig,
        slot: u8,
        frontend: Box<dyn Frontend>,
    ) -> Result<Self, String> {
        let save = SaveData::load(config.save_dir(), slot)?;
        let scripts = ScriptLibrary::load(&config.script_base())?;
        let talks = TalkTable::load(&config.talk_base())?;
        let start = config.start_submap;
        let mut ctx = EngineContext::new(config, save, scripts, talks, frontend);
        if slot == 0 && start >= 0 && !ctx.world.enter_submap(&ctx.save, start) {
            warn!("New game could not enter start sub-map {}", start);
        }
        Ok(ctx)
    }

    /// Copy bag and world state back into the base record
    pub fn sync_to_save(&mut self) {
        self.bag.store_into(&mut self.save.base);
        self.world.store_into(&mut self.save.base);
    }

    pub fn save_slot(&mut self, slot: u8) -> Result<(), String> {
        self.sync_to_save();
        self.save.save(self.config.save_dir(), slot)
    }

    /// Replace the game state with a slot; state is untouched when loading fails
    pub fn load_slot(&mut self, slot: u8) -> bool {
        if !self.save.load_into(self.config.save_dir(), slot) {
            return false;
        }
        self.bag = Bag::from_base(&self.save.base, self.save.items.len());
        self.world = World::from_base(&self.save.base);
        true
    }

    pub fn item_name(&self, item: i16) -> String {
        self.save
            .items
            .get(item)
            .map(|i| i.name())
            .unwrap_or_else(|| format!("item {}", item))
    }

    pub fn role_name(&self, role: i16) -> String {
        self.save
            .roles
            .get(role)
            .map(|r| r.name())
            .unwrap_or_else(|| format!("role {}", role))
    }
}

/// The event-script interpreter
pub struct Interpreter {
    pub ctx: EngineContext,
    state: ScriptState,
    run: RunState,
    /// Instructions executed since creation, for debugging
    instruction_count: u64,
}

impl Interpreter {
    pub fn new(ctx: EngineContext) -> Self {
        Interpreter {
            ctx,
            state: ScriptState::Idle,
            run: RunState::default(),
            instruction_count: 0,
        }
    }

    pub fn state(&self) -> ScriptState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == ScriptState::Idle
    }

    /// Word offset of the next instruction
    pub fn ip(&self) -> usize {
        self.run.ip
    }

    pub fn script_id(&self) -> i16 {
        self.run.script_id
    }

    pub fn source(&self) -> EventSource {
        self.run.source
    }

    /// Deferred steps still queued
    pub fn pending_steps(&self) -> usize {
        self.run.deferred.len()
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Start a script that no event object triggered
    pub fn run_event(&mut self, script_id: i16) -> Result<(), String> {
        self.run_event_from(script_id, EventSource::default())
    }

    /// Start a script for an event object. Runs until the script ends or pauses.
    /// Rejected while another script is running or paused.
    pub fn run_event_from(&mut self, script_id: i16, source: EventSource) -> Result<(), String> {
        if self.state != ScriptState::Idle {
            warn!(
                "run_event({}) rejected: script {} is {:?}",
                script_id, self.run.script_id, self.state
            );
            return Err(format!(
                "Script {} is still active, cannot start {}",
                self.run.script_id, script_id
            ));
        }
        let stream = match self.ctx.scripts.get(script_id) {
            Some(words) => words.to_vec(),
            None => {
                warn!("run_event: no script {}", script_id);
                return Ok(());
            }
        };
        debug!(
            "Starting script {} ({} words) from {:?}",
            script_id,
            stream.len(),
            source
        );
        self.run = RunState {
            script_id,
            stream,
            source,
            ..Default::default()
        };
        self.state = ScriptState::Running;
        self.dispatch()
    }

    /// Resume a script paused on the frontend with the outcome of the dialog, prompt,
    /// battle, fade or shop. Ignored unless the script waits on the frontend; animations
    /// and paths resume themselves from `tick`.
    pub fn continue_events(&mut self, result: bool) -> Result<(), String> {
        match self.state {
            ScriptState::Idle => {
                debug!("continue_events({}) while idle ignored", result);
                Ok(())
            }
            ScriptState::Running => {
                warn!("continue_events({}) while running ignored", result);
                Ok(())
            }
            ScriptState::Paused(PauseReason::Frontend) => self.resume(result),
            ScriptState::Paused(reason) => {
                warn!(
                    "continue_events({}) ignored: script {} waits on {:?}",
                    result, self.run.script_id, reason
                );
                Ok(())
            }
        }
    }

    /// Advance frame-driven work: the scripted animation and path, resuming the script
    /// when the one it waits for completes
    pub fn tick(&mut self) -> Result<(), String> {
        let ctx = &mut self.ctx;
        let animation_done = !ctx.world.is_animating() || ctx.world.step_animation(&mut ctx.save);
        let path_done = ctx.world.path_len() == 0 || ctx.world.step_path();
        match self.state {
            ScriptState::Paused(PauseReason::Animation) if animation_done => self.resume(true),
            ScriptState::Paused(PauseReason::Path) if path_done => self.resume(true),
            _ => Ok(()),
        }
    }

    fn resume(&mut self, result: bool) -> Result<(), String> {
        debug!(
            "Resuming script {} at {} after {:?} with {}",
            self.run.script_id, self.run.ip, self.state, result
        );
        match std::mem::take(&mut self.run.pending) {
            Resume::Nothing => {}
            Resume::Advance { on_true, on_false } => {
                self.jump(if result { on_true } else { on_false })
            }
            Resume::AbortOnLoss => {
                if !result {
                    info!("Script {} aborted after a lost battle", self.run.script_id);
                    self.run.deferred.clear();
                    self.run.ip = self.run.stream.len();
                }
            }
        }
        self.state = ScriptState::Running;
        self.run.executed = 0;
        self.dispatch()
    }

    fn dispatch(&mut self) -> Result<(), String> {
        while self.state == ScriptState::Running {
            self.run.executed += 1;
            if self.run.executed > MAX_INSTRUCTIONS_PER_RUN {
                let id = self.run.script_id;
                self.finish();
                return Err(format!(
                    "Script {} exceeded {} instructions without pausing",
                    id, MAX_INSTRUCTIONS_PER_RUN
                ));
            }
            self.run.pending = Resume::Nothing;
            let outcome = match self.run.deferred.pop_front() {
                Some(step) => self.execute_step(step),
                None => self.execute_next(),
            };
            match outcome {
                Ok(OpResult::Pause(reason)) => {
                    if self.state == ScriptState::Running {
                        debug!("Script {} paused for {:?}", self.run.script_id, reason);
                        self.state = ScriptState::Paused(reason);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    self.finish();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Decode and execute the instruction at the instruction pointer
    fn execute_next(&mut self) -> Result<OpResult, String> {
        if self.run.ip >= self.run.stream.len() {
            self.finish();
            return Ok(OpResult::Continue);
        }
        let inst = match Instruction::decode(&self.run.stream, self.run.ip) {
            Ok(inst) => inst,
            Err(e) => {
                warn!("Script {}: {}", self.run.script_id, e);
                self.finish();
                return Ok(OpResult::Continue);
            }
        };
        let spec = match inst.spec {
            Some(spec) => spec,
            None => {
                debug!(
                    "Script {}: skipping unknown opcode {} at {}",
                    self.run.script_id, inst.code, self.run.ip
                );
                self.run.ip += 1;
                return Ok(OpResult::Continue);
            }
        };
        debug!("{:>5}: {}", self.run.ip, inst);
        self.run.ip += inst.size;
        self.instruction_count += 1;

        let result = (spec.handler)(self, &inst.args)?;
        match (result, inst.jumps) {
            (OpResult::Branch(taken), Some((on_true, on_false))) => {
                self.jump(if taken { on_true } else { on_false });
                Ok(OpResult::Continue)
            }
            (OpResult::Deferred, Some((on_true, on_false))) => {
                self.run.pending = Resume::Advance { on_true, on_false };
                Ok(OpResult::Pause(PauseReason::Frontend))
            }
            (OpResult::Branch(_), None) | (OpResult::Deferred, None) => {
                warn!("{} returned a branch without jump words", spec.name);
                Ok(OpResult::Continue)
            }
            (other, _) => Ok(other),
        }
    }

    fn execute_step(&mut self, step: ScriptStep) -> Result<OpResult, String> {
        debug!("Script {} step {:?}", self.run.script_id, step);
        match step {
            ScriptStep::Talk {
                talk_id,
                head_id,
                style,
            } => self.show_talk(talk_id, head_id, style),
            ScriptStep::Notice(lines) => self.notice(lines),
            ScriptStep::AddItem {
                item,
                count,
                notify,
            } => {
                self.ctx.bag.add(item, count as i32);
                if notify {
                    let line = format!("Obtained {} x{}", self.ctx.item_name(item), count);
                    self.notice(vec![line])
                } else {
                    Ok(OpResult::Continue)
                }
            }
            ScriptStep::Battle {
                battle_id,
                grants_exp,
                abort_on_loss,
            } => {
                self.ctx.frontend.enter_battle(battle_id, grants_exp)?;
                if abort_on_loss {
                    self.run.pending = Resume::AbortOnLoss;
                }
                Ok(OpResult::Pause(PauseReason::Frontend))
            }
            ScriptStep::SetEventTex { submap, event, tex } => {
                let ctx = &mut self.ctx;
                if let Some(e) = ctx.save.event_mut(submap, event) {
                    e.curr_tex = tex;
                    ctx.world.refresh_event(&ctx.save, submap, event);
                }
                Ok(OpResult::Continue)
            }
            ScriptStep::SetBlocked {
                submap,
                event,
                blocked,
            } => {
                if let Some(e) = self.ctx.save.event_mut(submap, event) {
                    e.blocked = blocked;
                }
                Ok(OpResult::Continue)
            }
            ScriptStep::Animate(job) => {
                self.ctx.world.start_animation(job);
                Ok(OpResult::Pause(PauseReason::Animation))
            }
            ScriptStep::FadeOut => {
                self.ctx.frontend.fade_out()?;
                Ok(OpResult::Pause(PauseReason::Frontend))
            }
            ScriptStep::FadeIn => {
                self.ctx.frontend.fade_in()?;
                Ok(OpResult::Pause(PauseReason::Frontend))
            }
            ScriptStep::ClosePopup => {
                self.ctx.frontend.close_popup()?;
                Ok(OpResult::Continue)
            }
            ScriptStep::Exit => {
                self.exit_script()?;
                Ok(OpResult::Continue)
            }
        }
    }

    fn jump(&mut self, delta: i16) {
        let target = self.run.ip as i64 + delta as i64;
        self.run.ip = target.max(0) as usize;
    }

    fn finish(&mut self) {
        if self.state != ScriptState::Idle {
            debug!(
                "Script {} finished after {} instructions",
                self.run.script_id, self.run.executed
            );
        }
        self.state = ScriptState::Idle;
        self.run.pending = Resume::Nothing;
        self.run.deferred.clear();
    }

    // Helpers shared by the opcode handlers

    pub(crate) fn queue_step(&mut self, step: ScriptStep) {
        self.run.deferred.push_back(step);
    }

    /// End the script at the next dispatch and drop anything queued
    pub(crate) fn exit_script(&mut self) -> Result<(), String> {
        self.run.deferred.clear();
        self.run.ip = self.run.stream.len();
        self.ctx.frontend.close_popup()?;
        Ok(())
    }

    pub(crate) fn show_talk(
        &mut self,
        talk_id: i16,
        head_id: i16,
        style: i16,
    ) -> Result<OpResult, String> {
        let lines = self.ctx.talks.lines(talk_id);
        self.ctx
            .frontend
            .show_talk(&lines, head_id, TalkPosition::from_raw(style))?;
        Ok(OpResult::Pause(PauseReason::Frontend))
    }

    pub(crate) fn notice(&mut self, lines: Vec<String>) -> Result<OpResult, String> {
        self.ctx.frontend.show_notice(&lines)?;
        Ok(OpResult::Pause(PauseReason::Frontend))
    }

    /// Ask a yes/no question whose answer picks the jump
    pub(crate) fn ask(&mut self, question: &str) -> Result<OpResult, String> {
        self.ctx.frontend.ask(&[question.to_string()])?;
        Ok(OpResult::Deferred)
    }

    /// Sub-map named by a script argument, -1 meaning the current one
    pub(crate) fn resolve_submap(&self, raw: i16) -> i16 {
        Target::from_raw(raw).resolve(self.ctx.world.current_submap())
    }

    /// Event object named by a script argument, -1 meaning the one that triggered the script
    pub(crate) fn resolve_event(&self, raw: i16) -> i16 {
        Target::from_raw(raw).resolve(self.run.source.event.unwrap_or(-1))
    }

    /// Item the player used to trigger this script
    pub(crate) fn last_item(&self) -> Option<i16> {
        self.run.source.item
    }

    /// The protagonist, -1 with an empty team
    pub(crate) fn lead_role(&self) -> i16 {
        self.ctx.save.lead_role().unwrap_or(-1)
    }
}
