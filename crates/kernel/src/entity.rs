use std::any::Any;
use std::fmt;
use std::rc::Rc;

use canvasloop_common::{EntityId, Rect, SpriteHandle, Surface};

/// Mutable state of a single entity.
///
/// Position and size are in world units (or device pixels when drawn in
/// pass-through mode). `data` carries whatever else the application needs.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<D> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub sprite: SpriteHandle,
    pub data: D,
}

impl<D> EntityState<D> {
    pub fn new(x: f64, y: f64, width: f64, height: f64, sprite: SpriteHandle, data: D) -> Self {
        Self {
            x,
            y,
            width,
            height,
            sprite,
            data,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Creation-time options. Fixed once the entity is registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityOptions {
    /// Draw the entity's sprite directly at its raw position instead of
    /// calling its render hook when no camera is active.
    pub auto_render: bool,
}

impl EntityOptions {
    pub fn auto_render() -> Self {
        Self { auto_render: true }
    }
}

/// The three behaviors every entity kind must supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Update,
    Render,
    Create,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update => f.write_str("update"),
            Self::Render => f.write_str("render"),
            Self::Create => f.write_str("create"),
        }
    }
}

/// Errors from building entity kinds.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("entity kind `{kind}` does not implement `{slot}`")]
    NotImplemented { kind: String, slot: Slot },
}

type UpdateFn<D> = dyn Fn(&mut EntityState<D>);
type RenderFn<D> = dyn Fn(&EntityState<D>, &mut dyn Surface);
type CreateFn<D> = dyn Fn() -> EntityState<D>;

/// Collects the behavior slots of an entity kind before validation.
pub struct EntityKindBuilder<D> {
    name: String,
    update: Option<Rc<UpdateFn<D>>>,
    render: Option<Rc<RenderFn<D>>>,
    create: Option<Rc<CreateFn<D>>>,
}

impl<D: 'static> EntityKindBuilder<D> {
    /// Per-tick update hook.
    pub fn update(mut self, f: impl Fn(&mut EntityState<D>) + 'static) -> Self {
        self.update = Some(Rc::new(f));
        self
    }

    /// Custom render hook, used in pass-through mode for entities without
    /// `auto_render`.
    pub fn render(mut self, f: impl Fn(&EntityState<D>, &mut dyn Surface) + 'static) -> Self {
        self.render = Some(Rc::new(f));
        self
    }

    /// Produces the initial state. Runs exactly once per registered entity.
    pub fn create(mut self, f: impl Fn() -> EntityState<D> + 'static) -> Self {
        self.create = Some(Rc::new(f));
        self
    }

    /// Validate that all three slots are present.
    pub fn build(self) -> Result<EntityKind<D>, EntityError> {
        let missing = |slot| EntityError::NotImplemented {
            kind: self.name.clone(),
            slot,
        };
        let update = self.update.clone().ok_or_else(|| missing(Slot::Update))?;
        let render = self.render.clone().ok_or_else(|| missing(Slot::Render))?;
        let create = self.create.clone().ok_or_else(|| missing(Slot::Create))?;
        Ok(EntityKind {
            name: Rc::from(self.name.as_str()),
            update,
            render,
            create,
        })
    }
}

/// A constructible entity kind: a validated record of update, render and
/// create behaviors.
///
/// Cloning is cheap; clones share the same behaviors.
pub struct EntityKind<D> {
    name: Rc<str>,
    update: Rc<UpdateFn<D>>,
    render: Rc<RenderFn<D>>,
    create: Rc<CreateFn<D>>,
}

impl<D: 'static> EntityKind<D> {
    pub fn builder(name: impl Into<String>) -> EntityKindBuilder<D> {
        EntityKindBuilder {
            name: name.into(),
            update: None,
            render: None,
            create: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `create` and wrap the resulting state with this kind's behaviors.
    pub fn instantiate(&self) -> Box<dyn Component> {
        Box::new(Instance {
            kind: self.clone(),
            state: (self.create)(),
        })
    }
}

impl<D> Clone for EntityKind<D> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            update: Rc::clone(&self.update),
            render: Rc::clone(&self.render),
            create: Rc::clone(&self.create),
        }
    }
}

impl<D> fmt::Debug for EntityKind<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityKind").field("name", &self.name).finish()
    }
}

/// Type-erased capability set of a live entity.
pub trait Component {
    fn kind(&self) -> &str;
    fn update(&mut self);
    fn render(&self, surface: &mut dyn Surface);
    fn bounds(&self) -> Rect;
    fn sprite(&self) -> SpriteHandle;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Instance<D> {
    kind: EntityKind<D>,
    state: EntityState<D>,
}

impl<D: 'static> Component for Instance<D> {
    fn kind(&self) -> &str {
        self.kind.name()
    }

    fn update(&mut self) {
        (self.kind.update)(&mut self.state);
    }

    fn render(&self, surface: &mut dyn Surface) {
        (self.kind.render)(&self.state, surface);
    }

    fn bounds(&self) -> Rect {
        self.state.bounds()
    }

    fn sprite(&self) -> SpriteHandle {
        self.state.sprite
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A registered entity: identity, options, and its live component.
pub struct Entity {
    id: EntityId,
    options: EntityOptions,
    component: Box<dyn Component>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, options: EntityOptions, component: Box<dyn Component>) -> Self {
        Self {
            id,
            options,
            component,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn options(&self) -> EntityOptions {
        self.options
    }

    pub fn kind(&self) -> &str {
        self.component.kind()
    }

    /// World-space bounds from the current state.
    pub fn bounds(&self) -> Rect {
        self.component.bounds()
    }

    pub fn sprite(&self) -> SpriteHandle {
        self.component.sprite()
    }

    pub fn update(&mut self) {
        self.component.update();
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        self.component.render(surface);
    }

    /// Typed view of the state. `None` if `D` is not this entity's payload type.
    pub fn state<D: 'static>(&self) -> Option<&EntityState<D>> {
        self.component
            .as_any()
            .downcast_ref::<Instance<D>>()
            .map(|i| &i.state)
    }

    pub fn state_mut<D: 'static>(&mut self) -> Option<&mut EntityState<D>> {
        self.component
            .as_any_mut()
            .downcast_mut::<Instance<D>>()
            .map(|i| &mut i.state)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("options", &self.options)
            .field("bounds", &self.bounds())
            .finish()
    }
}
