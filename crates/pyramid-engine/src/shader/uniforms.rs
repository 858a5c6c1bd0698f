use std::fmt;

/// The fixed set of named uniforms a program may expose.
///
/// Names are resolved once at link time into a [`UniformTable`]; frames
/// address uniforms by slot and never look names up again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum UniformSlot {
    Sampler,
    Time,
    Resolution,
    Mouse,
    Pos,
    Kernel,
    KernelWeight,
    Projection,
    ModelView,
}

impl UniformSlot {
    pub const ALL: [UniformSlot; 9] = [
        UniformSlot::Sampler,
        UniformSlot::Time,
        UniformSlot::Resolution,
        UniformSlot::Mouse,
        UniformSlot::Pos,
        UniformSlot::Kernel,
        UniformSlot::KernelWeight,
        UniformSlot::Projection,
        UniformSlot::ModelView,
    ];

    /// Shader-side identifier.
    pub const fn name(self) -> &'static str {
        match self {
            UniformSlot::Sampler => "uSampler",
            UniformSlot::Time => "uTime",
            UniformSlot::Resolution => "uResolution",
            UniformSlot::Mouse => "uMouse",
            UniformSlot::Pos => "uPos",
            UniformSlot::Kernel => "uKernel",
            UniformSlot::KernelWeight => "uKernelWeight",
            UniformSlot::Projection => "uPM",
            UniformSlot::ModelView => "uMVM",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub const fn kind(self) -> UniformKind {
        match self {
            UniformSlot::Sampler => UniformKind::Texture,
            UniformSlot::Time | UniformSlot::KernelWeight => UniformKind::Float,
            UniformSlot::Resolution | UniformSlot::Mouse | UniformSlot::Pos => UniformKind::Vec2,
            UniformSlot::Kernel => UniformKind::Kernel3x3,
            UniformSlot::Projection | UniformSlot::ModelView => UniformKind::Mat4,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for UniformSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shader-side type of a uniform slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    /// `texture_2d<f32>` resource.
    Texture,
    /// `f32`
    Float,
    /// `vec2<f32>`
    Vec2,
    /// `mat4x4<f32>`, column-major.
    Mat4,
    /// `array<vec4<f32>, 3>`: a 3×3 kernel stored row by row, `w` unused.
    Kernel3x3,
}

impl UniformKind {
    /// Byte size inside a uniform block; `0` for resources.
    pub const fn size(self) -> u32 {
        match self {
            UniformKind::Texture => 0,
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Mat4 => 64,
            UniformKind::Kernel3x3 => 48,
        }
    }
}

/// Where a resolved uniform lives.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformLocation {
    /// Member of the program's uniform block.
    Block { offset: u32, kind: UniformKind },

    /// Texture resource. `group` is the bind group the texture must be bound
    /// at, the wgpu counterpart of a texture unit.
    Texture {
        group: u32,
        binding: u32,
        sampler_binding: Option<u32>,
    },
}

/// Binding point and size of the program's uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlockBinding {
    pub group: u32,
    pub binding: u32,
    pub size: u32,
}

/// Uniform locations resolved at link time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformTable {
    block: Option<BlockBinding>,
    locations: [Option<UniformLocation>; 9],
}

impl UniformTable {
    pub(crate) fn new(block: Option<BlockBinding>) -> Self {
        Self {
            block,
            locations: [None; 9],
        }
    }

    pub(crate) fn insert(&mut self, slot: UniformSlot, location: UniformLocation) {
        self.locations[slot.index()] = Some(location);
    }

    /// Looks up a uniform by its shader name.
    ///
    /// `None` covers both unknown names and names the program does not use;
    /// callers skip setting such uniforms.
    pub fn resolve(&self, name: &str) -> Option<UniformLocation> {
        UniformSlot::from_name(name).and_then(|slot| self.get(slot))
    }

    pub fn get(&self, slot: UniformSlot) -> Option<UniformLocation> {
        self.locations[slot.index()]
    }

    pub fn block(&self) -> Option<BlockBinding> {
        self.block
    }

    /// Bind group holding the texture for `slot`, if resolved.
    pub fn texture_group(&self, slot: UniformSlot) -> Option<u32> {
        match self.get(slot)? {
            UniformLocation::Texture { group, .. } => Some(group),
            UniformLocation::Block { .. } => None,
        }
    }
}

/// CPU staging copy of a program's uniform block.
///
/// Setters write at the offsets resolved at link time. A slot the program
/// does not expose is skipped; the setter reports whether anything was written.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    table: UniformTable,
    bytes: Vec<u8>,
    dirty: bool,
}

impl UniformBlock {
    pub fn new(table: UniformTable) -> Self {
        let size = table.block().map_or(0, |b| b.size as usize);
        Self {
            table,
            bytes: vec![0; size],
            dirty: size > 0,
        }
    }

    pub fn table(&self) -> &UniformTable {
        &self.table
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn set_f32(&mut self, slot: UniformSlot, value: f32) -> bool {
        self.write(slot, UniformKind::Float, bytemuck::bytes_of(&value))
    }

    pub fn set_vec2(&mut self, slot: UniformSlot, value: [f32; 2]) -> bool {
        self.write(slot, UniformKind::Vec2, bytemuck::cast_slice(&value))
    }

    /// Writes a column-major 4×4 matrix.
    pub fn set_mat4(&mut self, slot: UniformSlot, cols: [f32; 16]) -> bool {
        self.write(slot, UniformKind::Mat4, bytemuck::cast_slice(&cols))
    }

    /// Writes a row-major 3×3 kernel, padding each row to a `vec4`.
    pub fn set_kernel(&mut self, slot: UniformSlot, kernel: [f32; 9]) -> bool {
        let mut rows = [0.0f32; 12];
        for (row, chunk) in kernel.chunks_exact(3).enumerate() {
            rows[row * 4..row * 4 + 3].copy_from_slice(chunk);
        }
        self.write(slot, UniformKind::Kernel3x3, bytemuck::cast_slice(&rows))
    }

    /// Reads back the raw bytes of a slot.
    pub fn slot_bytes(&self, slot: UniformSlot) -> Option<&[u8]> {
        match self.table.get(slot)? {
            UniformLocation::Block { offset, kind } => {
                let start = offset as usize;
                self.bytes.get(start..start + kind.size() as usize)
            }
            UniformLocation::Texture { .. } => None,
        }
    }

    fn write(&mut self, slot: UniformSlot, expected: UniformKind, data: &[u8]) -> bool {
        let Some(UniformLocation::Block { offset, kind }) = self.table.get(slot) else {
            return false;
        };
        if kind != expected {
            log::warn!("uniform {slot} is {kind:?}, ignoring {expected:?} write");
            return false;
        }

        let start = offset as usize;
        let Some(dst) = self.bytes.get_mut(start..start + data.len()) else {
            log::warn!("uniform {slot} at offset {offset} overruns the uniform block");
            return false;
        };
        dst.copy_from_slice(data);
        self.dirty = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> UniformTable {
        let mut t = UniformTable::new(Some(BlockBinding { group: 0, binding: 0, size: 80 }));
        t.insert(UniformSlot::ModelView, UniformLocation::Block { offset: 0, kind: UniformKind::Mat4 });
        t.insert(UniformSlot::Time, UniformLocation::Block { offset: 64, kind: UniformKind::Float });
        t.insert(UniformSlot::Pos, UniformLocation::Block { offset: 72, kind: UniformKind::Vec2 });
        t.insert(
            UniformSlot::Sampler,
            UniformLocation::Texture { group: 1, binding: 0, sampler_binding: Some(1) },
        );
        t
    }

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes.chunks_exact(4).map(bytemuck::pod_read_unaligned::<f32>).collect()
    }

    // ── slots ─────────────────────────────────────────────────────────────

    #[test]
    fn names_round_trip() {
        for slot in UniformSlot::ALL {
            assert_eq!(UniformSlot::from_name(slot.name()), Some(slot));
        }
    }

    #[test]
    fn unknown_name_is_not_a_slot() {
        assert_eq!(UniformSlot::from_name("uColor"), None);
    }

    // ── table ─────────────────────────────────────────────────────────────

    #[test]
    fn resolve_known_and_missing() {
        let t = table();
        assert_eq!(
            t.resolve("uTime"),
            Some(UniformLocation::Block { offset: 64, kind: UniformKind::Float })
        );
        assert_eq!(t.resolve("uMouse"), None);
        assert_eq!(t.resolve("not_a_uniform"), None);
    }

    #[test]
    fn texture_group_only_for_textures() {
        let t = table();
        assert_eq!(t.texture_group(UniformSlot::Sampler), Some(1));
        assert_eq!(t.texture_group(UniformSlot::Time), None);
    }

    // ── block writes ──────────────────────────────────────────────────────

    #[test]
    fn writes_land_at_resolved_offsets() {
        let mut b = UniformBlock::new(table());
        assert!(b.set_f32(UniformSlot::Time, 2.5));
        assert!(b.set_vec2(UniformSlot::Pos, [0.25, -1.0]));
        assert_eq!(floats(&b.as_bytes()[64..68]), vec![2.5]);
        assert_eq!(floats(&b.as_bytes()[72..80]), vec![0.25, -1.0]);
    }

    #[test]
    fn missing_slot_is_skipped() {
        let mut b = UniformBlock::new(table());
        let before = b.as_bytes().to_vec();
        assert!(!b.set_vec2(UniformSlot::Mouse, [1.0, 1.0]));
        assert_eq!(b.as_bytes(), &before[..]);
    }

    #[test]
    fn kind_mismatch_is_skipped() {
        let mut b = UniformBlock::new(table());
        assert!(!b.set_vec2(UniformSlot::Time, [1.0, 2.0]));
        assert!(!b.set_f32(UniformSlot::Sampler, 0.0));
    }

    #[test]
    fn mat4_is_written_column_major() {
        let mut b = UniformBlock::new(table());
        let cols: [f32; 16] = std::array::from_fn(|i| i as f32);
        b.set_mat4(UniformSlot::ModelView, cols);
        assert_eq!(floats(b.slot_bytes(UniformSlot::ModelView).unwrap()), cols.to_vec());
    }

    #[test]
    fn kernel_rows_are_padded() {
        let mut t = UniformTable::new(Some(BlockBinding { group: 0, binding: 0, size: 48 }));
        t.insert(UniformSlot::Kernel, UniformLocation::Block { offset: 0, kind: UniformKind::Kernel3x3 });
        let mut b = UniformBlock::new(t);
        b.set_kernel(UniformSlot::Kernel, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(
            floats(b.as_bytes()),
            vec![1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0, 9.0, 0.0]
        );
    }

    #[test]
    fn overrun_is_rejected() {
        let mut t = UniformTable::new(Some(BlockBinding { group: 0, binding: 0, size: 16 }));
        t.insert(UniformSlot::Projection, UniformLocation::Block { offset: 0, kind: UniformKind::Mat4 });
        let mut b = UniformBlock::new(t);
        assert!(!b.set_mat4(UniformSlot::Projection, [0.0; 16]));
    }

    #[test]
    fn dirty_tracking() {
        let mut b = UniformBlock::new(table());
        assert!(b.is_dirty());
        b.mark_clean();
        assert!(!b.is_dirty());
        b.set_f32(UniformSlot::Time, 1.0);
        assert!(b.is_dirty());
    }

    #[test]
    fn no_block_means_empty_staging() {
        let b = UniformBlock::new(UniformTable::new(None));
        assert!(b.as_bytes().is_empty());
        assert!(!b.is_dirty());
    }
}
