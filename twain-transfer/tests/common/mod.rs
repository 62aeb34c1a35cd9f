//! Shared test doubles for the transfer integration tests.
//!
//! - `MockSource`: scripted data source sharing a heap with the core
//! - `RecordingMemory`: `MemoryManager` that logs every primitive call
//! - `RecordingFileStore`: `FileStore` over a temp dir that logs every call
//! - `RecordingSink`: scripted decisions, captured deliveries and failures

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;
use twain_transfer::twain_protocol::{
    Address, AudioInfo, CapabilityId, ConditionCode, DataGroups, DataSource, ExtImageInfo,
    ExtInfoId, FileFormat, Handle, ImageInfo, ImageLayout, ImageMemXfer, MemoryError,
    MemoryManager, Message, PendingXfers, ReturnCode, SetupFileXfer, SetupMemXfer, State,
    Status, XferMech,
};
use twain_transfer::{
    DataTransferred, FileStore, HeapMemory, Payload, ReadyDecision, Session, StateError,
    TempDirFileStore, TransferConfig, TransferError, TransferReady, TransferRoutine,
    TransferSink, TransferSummary,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// One scripted answer to a chunk request.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub rc: ReturnCode,
    pub data: Vec<u8>,
    /// Overrides the reported `bytes_written`.
    pub claimed: Option<u32>,
}

impl Chunk {
    pub fn data(bytes: &[u8]) -> Self {
        Self { rc: ReturnCode::Success, data: bytes.to_vec(), claimed: None }
    }

    pub fn done(bytes: &[u8]) -> Self {
        Self { rc: ReturnCode::XferDone, data: bytes.to_vec(), claimed: None }
    }

    pub fn fail(rc: ReturnCode) -> Self {
        Self { rc, data: Vec::new(), claimed: None }
    }
}

/// Scripted data source. Every request is appended to `calls`.
pub struct MockSource {
    heap: Rc<HeapMemory>,
    pub calls: Vec<&'static str>,
    pub pending: u16,
    pub end_xfer_rc: ReturnCode,
    pub xfer_group: DataGroups,
    pub xfer_group_rc: ReturnCode,
    pub image_mech: Option<u16>,
    pub audio_mech: Option<u16>,
    pub ext_info_supported: bool,
    pub ext_handles: Vec<Handle>,
    pub native_payload: Vec<u8>,
    pub native_rc: ReturnCode,
    pub native_null: bool,
    pub native_handles: Vec<Handle>,
    pub setup_file: Option<SetupFileXfer>,
    pub file_rc: ReturnCode,
    pub file_contents: Vec<u8>,
    pub setup_mem: Option<SetupMemXfer>,
    pub chunks: VecDeque<Chunk>,
    pub chunk_buffer_lengths: Vec<u32>,
    pub status: Status,
    pub image_info: Option<ImageInfo>,
    pub audio_info: Option<AudioInfo>,
    pub disable_rc: ReturnCode,
}

impl MockSource {
    /// One pending native image.
    pub fn new(heap: Rc<HeapMemory>) -> Self {
        Self {
            heap,
            calls: Vec::new(),
            pending: 1,
            end_xfer_rc: ReturnCode::Success,
            xfer_group: DataGroups::IMAGE,
            xfer_group_rc: ReturnCode::Success,
            image_mech: Some(XferMech::Native.raw()),
            audio_mech: None,
            ext_info_supported: false,
            ext_handles: Vec::new(),
            native_payload: b"native image".to_vec(),
            native_rc: ReturnCode::XferDone,
            native_null: false,
            native_handles: Vec::new(),
            setup_file: Some(SetupFileXfer {
                file_name: "scan.tif".to_string(),
                format: FileFormat::Tiff,
            }),
            file_rc: ReturnCode::XferDone,
            file_contents: b"file data".to_vec(),
            setup_mem: Some(SetupMemXfer { min_buf_size: 0, max_buf_size: 0, preferred: 16 }),
            chunks: VecDeque::new(),
            chunk_buffer_lengths: Vec::new(),
            status: Status { condition_code: ConditionCode::PaperJam, data: 0 },
            image_info: Some(ImageInfo { image_width: 640, image_length: 480, ..Default::default() }),
            audio_info: Some(AudioInfo { name: "clip".to_string(), reserved: 0 }),
            disable_rc: ReturnCode::Success,
        }
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn native(&mut self, handle: &mut Handle) -> ReturnCode {
        if self.native_rc == ReturnCode::XferDone {
            *handle = if self.native_null {
                Handle::NULL
            } else {
                self.heap.allocate_with(&self.native_payload).unwrap()
            };
            self.native_handles.push(*handle);
        }
        self.native_rc
    }

    fn chunk(&mut self, xfer: &mut ImageMemXfer) -> ReturnCode {
        self.chunk_buffer_lengths.push(xfer.memory.length);
        let Some(chunk) = self.chunks.pop_front() else {
            return ReturnCode::Failure;
        };
        if chunk.rc == ReturnCode::Success || chunk.rc == ReturnCode::XferDone {
            let _ = self.heap.write(xfer.memory.handle, 0, &chunk.data);
            xfer.bytes_written = chunk.claimed.unwrap_or(chunk.data.len() as u32);
        }
        chunk.rc
    }

    fn write_file(&mut self) -> ReturnCode {
        if self.file_rc == ReturnCode::XferDone {
            if let Some(setup) = &self.setup_file {
                let _ = std::fs::write(&setup.file_name, &self.file_contents);
            }
        }
        self.file_rc
    }
}

impl DataSource for MockSource {
    fn get_pending_xfers(&mut self, pending: &mut PendingXfers) -> ReturnCode {
        self.calls.push("pending");
        pending.count = self.pending;
        pending.end_of_job = 0;
        ReturnCode::Success
    }

    fn end_xfer(&mut self, pending: &mut PendingXfers) -> ReturnCode {
        self.calls.push("end_xfer");
        if self.end_xfer_rc != ReturnCode::Success {
            return self.end_xfer_rc;
        }
        self.pending = self.pending.saturating_sub(1);
        pending.count = self.pending;
        ReturnCode::Success
    }

    fn reset_pending_xfers(&mut self, pending: &mut PendingXfers) -> ReturnCode {
        self.calls.push("reset");
        self.pending = 0;
        pending.count = 0;
        ReturnCode::Success
    }

    fn get_setup_mem_xfer(&mut self, setup: &mut SetupMemXfer) -> ReturnCode {
        self.calls.push("setup_mem");
        match self.setup_mem {
            Some(s) => {
                *setup = s;
                ReturnCode::Success
            }
            None => ReturnCode::Failure,
        }
    }

    fn get_setup_file_xfer(&mut self, setup: &mut SetupFileXfer) -> ReturnCode {
        self.calls.push("setup_file");
        match &self.setup_file {
            Some(s) => {
                *setup = s.clone();
                ReturnCode::Success
            }
            None => ReturnCode::Failure,
        }
    }

    fn get_xfer_group(&mut self, groups: &mut DataGroups) -> ReturnCode {
        self.calls.push("xfer_group");
        *groups = self.xfer_group;
        self.xfer_group_rc
    }

    fn get_current_capability(&mut self, cap: CapabilityId, value: &mut u16) -> ReturnCode {
        self.calls.push("capability");
        let current = match cap {
            CapabilityId::ImageXferMech => self.image_mech,
            CapabilityId::AudioXferMech => self.audio_mech,
            _ => None,
        };
        match current {
            Some(v) => {
                *value = v;
                ReturnCode::Success
            }
            None => ReturnCode::Failure,
        }
    }

    fn supports_capability(&self, cap: CapabilityId) -> bool {
        cap == CapabilityId::ExtImageInfo && self.ext_info_supported
    }

    fn get_status(&mut self, status: &mut Status) -> ReturnCode {
        self.calls.push("status");
        *status = self.status;
        ReturnCode::Success
    }

    fn disable(&mut self) -> ReturnCode {
        self.calls.push("disable");
        self.disable_rc
    }

    fn get_image_info(&mut self, info: &mut ImageInfo) -> ReturnCode {
        self.calls.push("image_info");
        match self.image_info {
            Some(i) => {
                *info = i;
                ReturnCode::Success
            }
            None => ReturnCode::Failure,
        }
    }

    fn get_ext_image_info(&mut self, info: &mut ExtImageInfo) -> ReturnCode {
        self.calls.push("ext_image_info");
        if !self.ext_info_supported {
            return ReturnCode::Failure;
        }
        for entry in &mut info.entries {
            entry.item = self.heap.allocate_with(b"ext").unwrap();
            entry.num_items = 1;
            entry.return_code = ReturnCode::Success;
            self.ext_handles.push(entry.item);
        }
        ReturnCode::Success
    }

    fn image_layout(&mut self, _: Message, _: &mut ImageLayout) -> ReturnCode {
        self.calls.push("layout");
        ReturnCode::Success
    }

    fn image_native_xfer(&mut self, handle: &mut Handle) -> ReturnCode {
        self.calls.push("image_native");
        self.native(handle)
    }

    fn image_file_xfer(&mut self) -> ReturnCode {
        self.calls.push("image_file");
        self.write_file()
    }

    fn image_mem_xfer(&mut self, xfer: &mut ImageMemXfer) -> ReturnCode {
        self.calls.push("image_mem");
        self.chunk(xfer)
    }

    fn image_mem_file_xfer(&mut self, xfer: &mut ImageMemXfer) -> ReturnCode {
        self.calls.push("image_mem_file");
        self.chunk(xfer)
    }

    fn get_audio_info(&mut self, info: &mut AudioInfo) -> ReturnCode {
        self.calls.push("audio_info");
        match &self.audio_info {
            Some(i) => {
                *info = i.clone();
                ReturnCode::Success
            }
            None => ReturnCode::Failure,
        }
    }

    fn audio_native_xfer(&mut self, handle: &mut Handle) -> ReturnCode {
        self.calls.push("audio_native");
        self.native(handle)
    }

    fn audio_file_xfer(&mut self) -> ReturnCode {
        self.calls.push("audio_file");
        self.write_file()
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemCall {
    Allocate(Handle, u32),
    Lock(Handle),
    Unlock(Handle),
    Free(Handle),
}

/// Delegates to a shared heap and logs every primitive call.
pub struct RecordingMemory {
    heap: Rc<HeapMemory>,
    calls: RefCell<Vec<MemCall>>,
}

impl RecordingMemory {
    pub fn new(heap: Rc<HeapMemory>) -> Self {
        Self { heap, calls: RefCell::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<MemCall> {
        self.calls.borrow().clone()
    }

    pub fn allocations(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MemCall::Allocate(_, size) => Some(size),
                _ => None,
            })
            .collect()
    }

    pub fn frees(&self) -> Vec<Handle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MemCall::Free(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    /// Every lock is undone before its free, and nothing is freed twice.
    pub fn assert_balanced(&self) {
        let mut locks: HashMap<Handle, u32> = HashMap::new();
        let mut freed: HashSet<Handle> = HashSet::new();
        for call in self.calls() {
            match call {
                MemCall::Allocate(..) => {}
                MemCall::Lock(h) => *locks.entry(h).or_default() += 1,
                MemCall::Unlock(h) => {
                    let count = locks.entry(h).or_default();
                    assert!(*count > 0, "unlock of {} without lock", h);
                    *count -= 1;
                }
                MemCall::Free(h) => {
                    assert_eq!(locks.get(&h).copied().unwrap_or(0), 0, "{} freed while locked", h);
                    assert!(freed.insert(h), "{} freed twice", h);
                }
            }
        }
        assert!(locks.values().all(|&n| n == 0), "locks left outstanding: {:?}", locks);
    }
}

impl MemoryManager for RecordingMemory {
    fn allocate(&self, size: u32) -> Result<Handle, MemoryError> {
        let handle = self.heap.allocate(size)?;
        self.calls.borrow_mut().push(MemCall::Allocate(handle, size));
        Ok(handle)
    }

    fn free(&self, handle: Handle) {
        self.calls.borrow_mut().push(MemCall::Free(handle));
        self.heap.free(handle);
    }

    fn lock(&self, handle: Handle) -> Result<Address, MemoryError> {
        let address = self.heap.lock(handle)?;
        self.calls.borrow_mut().push(MemCall::Lock(handle));
        Ok(address)
    }

    fn unlock(&self, address: Address) {
        self.calls.borrow_mut().push(MemCall::Unlock(Handle::from_raw(address.as_raw())));
        self.heap.unlock(address);
    }

    fn read(&self, address: Address, offset: usize, dest: &mut [u8]) -> Result<(), MemoryError> {
        self.heap.read(address, offset, dest)
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCall {
    Create(PathBuf),
    Rename(PathBuf, PathBuf),
    Remove(PathBuf),
}

/// Temp-dir store that logs every call and can be told to fail renames.
pub struct RecordingFileStore {
    inner: TempDirFileStore,
    calls: RefCell<Vec<FileCall>>,
    pub fail_rename: bool,
}

impl RecordingFileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            inner: TempDirFileStore::new(dir),
            calls: RefCell::new(Vec::new()),
            fail_rename: false,
        }
    }

    pub fn calls(&self) -> Vec<FileCall> {
        self.calls.borrow().clone()
    }

    pub fn created(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                FileCall::Create(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn renames(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, FileCall::Rename(..))).count()
    }

    pub fn removes(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, FileCall::Remove(..))).count()
    }
}

impl FileStore for RecordingFileStore {
    type Writer = <TempDirFileStore as FileStore>::Writer;

    fn create_temp(&self) -> io::Result<(PathBuf, Self::Writer)> {
        let (path, writer) = self.inner.create_temp()?;
        self.calls.borrow_mut().push(FileCall::Create(path.clone()));
        Ok((path, writer))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.calls
            .borrow_mut()
            .push(FileCall::Rename(from.to_path_buf(), to.to_path_buf()));
        if self.fail_rename {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "rename refused"));
        }
        self.inner.rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.calls.borrow_mut().push(FileCall::Remove(path.to_path_buf()));
        self.inner.remove(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Native { handle: Handle, bytes: Vec<u8> },
    Memory(Vec<u8>),
    File { path: PathBuf, contents: Option<Vec<u8>> },
}

#[derive(Debug, Clone)]
pub struct Delivery {
    pub group: DataGroups,
    pub payload: Delivered,
    pub image_info: Option<ImageInfo>,
    pub ext_handles: Vec<Handle>,
    pub ext_ids: Vec<ExtInfoId>,
    pub audio_info: Option<AudioInfo>,
}

/// Answers `transfer_ready` from a script (then `Proceed`) and captures
/// everything it is told.
#[derive(Default)]
pub struct RecordingSink {
    pub decisions: VecDeque<ReadyDecision>,
    pub readies: Vec<TransferReady>,
    pub deliveries: Vec<Delivery>,
    pub errors: Vec<TransferError>,
    pub events: Vec<&'static str>,
    /// Bytes copied out of native blocks during the callback.
    pub native_read_len: usize,
}

impl RecordingSink {
    pub fn with_decisions(decisions: impl IntoIterator<Item = ReadyDecision>) -> Self {
        Self { decisions: decisions.into_iter().collect(), ..Default::default() }
    }
}

impl TransferSink for RecordingSink {
    fn transfer_ready(&mut self, ready: &TransferReady) -> ReadyDecision {
        self.events.push("ready");
        self.readies.push(ready.clone());
        self.decisions.pop_front().unwrap_or_default()
    }

    fn data_transferred(&mut self, data: DataTransferred<'_>) {
        self.events.push("data");
        let payload = match data.payload {
            Payload::Native(native) => {
                let mut bytes = vec![0u8; self.native_read_len];
                native.read(0, &mut bytes).expect("native block readable in callback");
                Delivered::Native { handle: native.handle(), bytes }
            }
            Payload::Memory(bytes) => Delivered::Memory(bytes),
            Payload::File(path) => {
                let contents = std::fs::read(&path).ok();
                Delivered::File { path, contents }
            }
        };
        let (ext_handles, ext_ids) = match data.ext_image_info {
            Some(ext) => (
                ext.owned_handles().collect(),
                ext.entries.iter().map(|e| e.info_id).collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        self.deliveries.push(Delivery {
            group: data.group,
            payload,
            image_info: data.image_info,
            ext_handles,
            ext_ids,
            audio_info: data.audio_info,
        });
    }

    fn transfer_error(&mut self, error: TransferError) {
        self.events.push("error");
        self.errors.push(error);
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Everything a transfer run needs, wired to the recording doubles.
pub struct Harness {
    pub dir: TempDir,
    pub heap: Rc<HeapMemory>,
    pub memory: RecordingMemory,
    pub files: RecordingFileStore,
    pub sink: RecordingSink,
    pub config: TransferConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_heap(HeapMemory::new())
    }

    pub fn with_heap(heap: HeapMemory) -> Self {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let heap = Rc::new(heap);
        Self {
            memory: RecordingMemory::new(heap.clone()),
            files: RecordingFileStore::new(dir.path()),
            sink: RecordingSink::default(),
            config: TransferConfig::default(),
            heap,
            dir,
        }
    }

    pub fn source(&self) -> MockSource {
        MockSource::new(self.heap.clone())
    }

    /// A session in state 6 supporting `groups`.
    pub fn session(&self, source: MockSource, groups: DataGroups) -> Session<MockSource> {
        Session::new(source, groups, State::TransferReady)
    }

    pub fn run(&mut self, session: &mut Session<MockSource>) -> Result<TransferSummary, StateError> {
        TransferRoutine::new(session, &self.memory, &self.files, &mut self.sink, &self.config).run()
    }

    /// Files left in the temp dir.
    pub fn dir_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}
