use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use foldhash::fast::FixedState;
use hashbrown::{HashMap, HashSet};
use serde_core::{Deserializer, Serializer, de, ser};

use crate::{CodecKind, JsonModule, Manifest, ModuleLoader, RegistryError};

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6A64_5F6A_736F_6E21);

type FixedHashMap<K, V> = HashMap<K, V, FixedState>;
type FixedHashSet<K> = HashSet<K, FixedState>;

// -----------------------------------------------------------------------------
// CodecRegistry

/// Table of generated codecs, keyed by their target type.
///
/// Codecs are added one [`ModuleLoader`] at a time with
/// [`register`](Self::register), or all at once with
/// [`auto_register`](Self::auto_register). A registered codec can then encode
/// and decode values whose type is only known at run time.
///
/// ```
/// use jd_json::{CodecRegistry, JsonData};
///
/// #[derive(JsonData, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let mut registry = CodecRegistry::new();
/// registry.register(&Point_Serializer);
/// registry.register(&Point_Deserializer);
///
/// let json = registry.encode_to_string(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(json, r#"{"x":1,"y":2}"#);
/// assert_eq!(registry.decode_from_str::<Point>(&json).unwrap(), Point { x: 1, y: 2 });
/// ```
pub struct CodecRegistry {
    encoders: FixedHashMap<TypeId, JsonModule>,
    decoders: FixedHashMap<TypeId, JsonModule>,
    type_name_to_id: FixedHashMap<&'static str, TypeId>,
    loaded: FixedHashSet<&'static str>,
    loaders: Vec<&'static str>,
}

impl Default for CodecRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.loaders.iter()).finish()
    }
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            encoders: HashMap::with_hasher(FIXED_HASH_STATE),
            decoders: HashMap::with_hasher(FIXED_HASH_STATE),
            type_name_to_id: HashMap::with_hasher(FIXED_HASH_STATE),
            loaded: HashSet::with_hasher(FIXED_HASH_STATE),
            loaders: Vec::new(),
        }
    }

    /// Adds the codec produced by `loader`.
    ///
    /// Returns `false` if a loader with the same name was already registered,
    /// in which case nothing changes. A different codec for an already covered
    /// type replaces the previous one.
    pub fn register(&mut self, loader: &dyn ModuleLoader) -> bool {
        let name = loader.name();
        if !self.loaded.insert(name) {
            return false;
        }

        let module = loader.module();
        let kind = module.kind();
        let target = module.target();
        let target_name = module.target_name();

        let table = match kind {
            CodecKind::Encoder => &mut self.encoders,
            CodecKind::Decoder => &mut self.decoders,
        };
        if let Some(previous) = table.insert(target, module) {
            log::warn!(
                "`{name}` replaces `{}` as the {kind} of `{target_name}`",
                previous.name()
            );
        }
        self.type_name_to_id.insert(target_name, target);
        self.loaders.push(name);

        log::debug!("registered {kind} `{name}` for `{target_name}`");
        true
    }

    /// Registers every codec submitted through `inventory`.
    ///
    /// Returns `false` if automatic registration is unavailable, either because
    /// the `auto_register` feature is disabled or because the platform does not
    /// support it.
    ///
    /// ```
    /// use jd_json::{CodecRegistry, JsonData};
    ///
    /// #[derive(JsonData)]
    /// struct Tag {
    ///     name: String,
    /// }
    ///
    /// let mut registry = CodecRegistry::new();
    /// if registry.auto_register() {
    ///     assert!(registry.contains::<Tag>());
    /// }
    /// ```
    pub fn auto_register(&mut self) -> bool {
        self.register_submitted()
    }

    #[cfg(feature = "auto_register")]
    fn register_submitted(&mut self) -> bool {
        use crate::__macro_exports::auto_register;

        if !auto_register::available() {
            return false;
        }
        for loader in auto_register::loaders() {
            self.register(loader);
        }
        true
    }

    #[cfg(not(feature = "auto_register"))]
    #[inline(always)]
    fn register_submitted(&mut self) -> bool {
        false
    }

    /// Whether both an encoder and a decoder of `T` are registered.
    pub fn contains<T: Any>(&self) -> bool {
        let id = TypeId::of::<T>();
        self.encoders.contains_key(&id) && self.decoders.contains_key(&id)
    }

    #[inline]
    pub fn get_encoder(&self, type_id: TypeId) -> Option<&JsonModule> {
        self.encoders.get(&type_id)
    }

    #[inline]
    pub fn get_decoder(&self, type_id: TypeId) -> Option<&JsonModule> {
        self.decoders.get(&type_id)
    }

    /// Decoder of the type whose `core::any::type_name` is `type_name`.
    pub fn get_decoder_by_name(&self, type_name: &str) -> Option<&JsonModule> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.decoders.get(id))
    }

    /// Whether a loader named `name` was registered.
    #[inline]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    /// Names of the registered loaders, in registration order.
    pub fn loaders(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.loaders.iter().copied()
    }

    /// Number of registered loaders.
    #[inline]
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Checks that every codec listed in `manifest` was registered.
    pub fn verify_manifest(&self, manifest: &Manifest) -> Result<(), RegistryError> {
        match manifest.entries().iter().find(|entry| !self.is_loaded(entry)) {
            Some(missing) => Err(RegistryError::MissingLoader(missing.clone())),
            None => Ok(()),
        }
    }

    /// Encodes a value whose type is only known at run time.
    pub fn serialize_any<S: Serializer>(
        &self,
        value: &dyn Any,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match self.encoders.get(&value.type_id()) {
            Some(module) => module.serialize(value, serializer),
            None => Err(<S::Error as ser::Error>::custom(
                "no encoder registered for the type of this value",
            )),
        }
    }

    /// Decodes a value of the type named `type_name`.
    pub fn deserialize_by_name<'de, D: Deserializer<'de>>(
        &self,
        type_name: &str,
        deserializer: D,
    ) -> Result<Box<dyn Any>, D::Error> {
        match self.get_decoder_by_name(type_name) {
            Some(module) => module.deserialize(deserializer),
            None => Err(<D::Error as de::Error>::custom(RegistryError::NotRegistered {
                kind: CodecKind::Decoder,
                type_name: type_name.to_owned(),
            })),
        }
    }

    /// Encodes `value` as a JSON string through its registered encoder.
    pub fn encode_to_string<T: Any>(&self, value: &T) -> Result<String, RegistryError> {
        let serializable = self
            .encoders
            .get(&TypeId::of::<T>())
            .and_then(|module| module.serializable(value))
            .ok_or_else(|| RegistryError::NotRegistered {
                kind: CodecKind::Encoder,
                type_name: type_name::<T>().to_owned(),
            })?;
        Ok(serde_json::to_string(serializable)?)
    }

    /// Decodes a `T` from a JSON string through its registered decoder.
    pub fn decode_from_str<T: Any>(&self, json: &str) -> Result<T, RegistryError> {
        let module = self
            .decoders
            .get(&TypeId::of::<T>())
            .ok_or_else(|| RegistryError::NotRegistered {
                kind: CodecKind::Decoder,
                type_name: type_name::<T>().to_owned(),
            })?;

        let mut deserializer = serde_json::Deserializer::from_str(json);
        let value = module.deserialize(&mut deserializer)?;
        deserializer.end()?;

        value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| RegistryError::TypeMismatch {
                expected: type_name::<T>(),
                found: module.target_name(),
            })
    }
}
