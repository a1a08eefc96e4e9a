pub mod list {
    use std::fmt;
    use std::mem;

    use tracing::debug;

    use crate::alloc::{Bounded, Global, NodeAllocator, Payload};
    use crate::config::ListConfig;
    use crate::error::{AllocError, ListError};

    /// 节点句柄，即节点在槽位数组中的下标
    ///
    /// 节点存活期间句柄保持不变；节点被移除后槽位可能被新节点复用。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeId(pub(crate) usize);

    impl NodeId {
        /// 返回句柄对应的槽位下标
        pub fn index(self) -> usize {
            self.0
        }
    }

    #[derive(Debug)]
    pub(crate) struct Node {
        pub(crate) data: Payload,
        pub(crate) prev: Option<NodeId>,
        pub(crate) next: Option<NodeId>,
    }

    /// 存放固定大小字节元素的双向链表
    ///
    /// 链表只负责结构，不解释元素内容：插入时复制 `element_size` 个字节，
    /// 移除时把这些字节复制给调用者。元素引用的外部资源需要调用者在
    /// 移除或销毁链表前自行释放。
    pub struct ByteList<A: NodeAllocator = Global> {
        pub(crate) slots: Vec<Option<Node>>,
        // 空闲槽位栈，容量始终不小于 slots.len()，出栈回收时不会再分配
        free: Vec<usize>,
        pub(crate) head: Option<NodeId>,
        pub(crate) tail: Option<NodeId>,
        element_size: usize,
        allocator: A,
    }

    // 构造
    impl ByteList<Global> {
        /// 构造一个空链表，每个元素占 `element_size` 字节
        ///
        /// # Panics
        /// `element_size` 为 0 时 panic，需要可恢复的错误请使用 [`ByteList::try_new`]。
        pub fn new(element_size: usize) -> Self {
            Self::with_allocator(element_size, Global)
        }

        /// 构造一个空链表，元素大小为 0 时返回错误而不是 panic
        ///
        /// # 参数
        /// - `element_size`: 每个元素的字节数
        ///
        /// # 返回值
        /// - `Ok(list)`: 空链表
        /// - `Err(ZeroElementSize)`: `element_size` 为 0
        pub fn try_new(element_size: usize) -> Result<Self, ListError> {
            Self::try_with_allocator(element_size, Global)
        }
    }

    impl ByteList<Bounded<Global>> {
        /// 根据配置构造链表，`node_limit` 限制同时存活的节点数量
        pub fn from_config(config: &ListConfig) -> Result<Self, ListError> {
            config.validate()?;
            let allocator = match config.node_limit {
                Some(limit) => Bounded::new(Global, limit),
                None => Bounded::unlimited(Global),
            };
            debug!(
                element_size = config.element_size,
                node_limit = ?config.node_limit,
                "creating list from config"
            );
            Ok(Self::init(config.element_size, allocator))
        }
    }

    // 基础实现
    impl<A: NodeAllocator> ByteList<A> {
        /// # Panics
        /// `element_size` 为 0 时 panic。
        pub fn with_allocator(element_size: usize, allocator: A) -> Self {
            assert!(element_size > 0, "element size must be greater than zero");
            Self::init(element_size, allocator)
        }

        pub fn try_with_allocator(element_size: usize, allocator: A) -> Result<Self, ListError> {
            if element_size == 0 {
                return Err(ListError::ZeroElementSize);
            }
            Ok(Self::init(element_size, allocator))
        }

        fn init(element_size: usize, allocator: A) -> Self {
            ByteList {
                slots: Vec::new(),
                free: Vec::new(),
                head: None,
                tail: None,
                element_size,
                allocator,
            }
        }

        /// 获取每个元素的字节数
        ///
        /// # 返回值
        /// 构造时确定的 `element_size`，链表存活期间不变
        pub fn element_size(&self) -> usize {
            self.element_size
        }

        /// 获取链表使用的节点分配器，可用于查询 `Bounded` 的存活节点数
        pub fn allocator(&self) -> &A {
            &self.allocator
        }

        /// 可变借用节点分配器，例如调整 `Bounded` 的上限
        ///
        /// # 注意
        /// 已分配的节点仍由原分配器释放，不要在此期间替换分配器的内部状态。
        pub fn allocator_mut(&mut self) -> &mut A {
            &mut self.allocator
        }

        /// 逐个节点遍历计数，复杂度 O(n)
        pub fn size(&self) -> usize {
            let mut count = 0;
            let mut current = self.head;
            while let Some(id) = current {
                count += 1;
                current = self.next_of(id);
            }
            count
        }

        /// 判断链表是否为空
        ///
        /// # 返回值
        /// head 为空时返回 `true`，复杂度 O(1)
        pub fn is_empty(&self) -> bool {
            self.head.is_none()
        }

        /// 在链表尾部插入 `data` 的副本
        ///
        /// # 返回值
        /// - `Ok(id)`: 新节点的句柄
        /// - `Err(SizeMismatch)`: `data` 长度不等于元素大小
        /// - `Err(AllocationFailed)`: 分配失败
        ///
        /// 返回错误时链表保持不变。
        pub fn push_back(&mut self, data: &[u8]) -> Result<NodeId, ListError> {
            let id = self.new_node(data)?;
            self.attach(id, self.tail);
            Ok(id)
        }

        /// 在链表头部插入 `data` 的副本，错误语义同 [`ByteList::push_back`]
        pub fn push_front(&mut self, data: &[u8]) -> Result<NodeId, ListError> {
            let id = self.new_node(data)?;
            self.attach(id, None);
            Ok(id)
        }

        /// 移除尾部元素
        ///
        /// `out` 为 `Some` 时把元素的字节复制进去，为 `None` 时直接丢弃。
        /// 链表为空时返回 `Err(Empty)`，`out` 不会被修改。
        pub fn pop_back(&mut self, out: Option<&mut [u8]>) -> Result<(), ListError> {
            let tail = self.tail.ok_or(ListError::Empty)?;
            self.remove_node(tail, out)
        }

        /// 移除头部元素，语义同 [`ByteList::pop_back`]
        pub fn pop_front(&mut self, out: Option<&mut [u8]>) -> Result<(), ListError> {
            let head = self.head.ok_or(ListError::Empty)?;
            self.remove_node(head, out)
        }

        /// 释放所有节点，不做任何元素级清理
        ///
        /// 对空链表调用没有效果，可以重复调用。
        pub fn destroy(&mut self) {
            while self.pop_front(None).is_ok() {}
            self.slots.clear();
            self.free.clear();
        }

        /// 借用头部元素的字节，不移除
        ///
        /// # 返回值
        /// 链表为空时返回 `None`
        pub fn front(&self) -> Option<&[u8]> {
            self.head.and_then(|id| self.payload(id))
        }

        /// 借用尾部元素的字节，不移除
        ///
        /// # 返回值
        /// 链表为空时返回 `None`
        pub fn back(&self) -> Option<&[u8]> {
            self.tail.and_then(|id| self.payload(id))
        }

        /// 可变借用头部元素的字节
        pub fn front_mut(&mut self) -> Option<&mut [u8]> {
            let head = self.head?;
            self.payload_mut(head)
        }

        /// 可变借用尾部元素的字节
        pub fn back_mut(&mut self) -> Option<&mut [u8]> {
            let tail = self.tail?;
            self.payload_mut(tail)
        }
    }

    // 节点级遍历
    impl<A: NodeAllocator> ByteList<A> {
        /// 获取头节点句柄，链表为空时返回 `None`
        pub fn first(&self) -> Option<NodeId> {
            self.head
        }

        /// 获取尾节点句柄，链表为空时返回 `None`
        pub fn last(&self) -> Option<NodeId> {
            self.tail
        }

        /// 判断句柄是否指向一个存活节点
        ///
        /// # 注意
        /// 节点移除后槽位可能被复用，旧句柄此时会指向新节点。
        pub fn contains(&self, id: NodeId) -> bool {
            self.get(id).is_some()
        }

        /// 获取 `id` 的后继节点
        ///
        /// # 返回值
        /// `id` 是尾节点或句柄无效时返回 `None`
        pub fn next_of(&self, id: NodeId) -> Option<NodeId> {
            self.get(id)?.next
        }

        /// 获取 `id` 的前驱节点
        ///
        /// # 返回值
        /// `id` 是头节点或句柄无效时返回 `None`
        pub fn prev_of(&self, id: NodeId) -> Option<NodeId> {
            self.get(id)?.prev
        }

        /// 借用节点中存放的 `element_size` 个字节
        ///
        /// # 返回值
        /// 句柄无效时返回 `None`
        pub fn payload(&self, id: NodeId) -> Option<&[u8]> {
            self.get(id).map(|node| node.data.as_bytes())
        }

        /// 可变借用节点中存放的字节，句柄无效时返回 `None`
        pub fn payload_mut(&mut self, id: NodeId) -> Option<&mut [u8]> {
            self.slots
                .get_mut(id.0)?
                .as_mut()
                .map(|node| node.data.as_bytes_mut())
        }

        /// 交换两个节点中存放的字节，节点本身的位置不变
        ///
        /// 任一句柄无效时返回 `false`。
        pub fn swap_payloads(&mut self, a: NodeId, b: NodeId) -> bool {
            if a == b {
                return self.contains(a);
            }
            let (low, high) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
            if high >= self.slots.len() {
                return false;
            }
            let (left, right) = self.slots.split_at_mut(high);
            match (left[low].as_mut(), right[0].as_mut()) {
                (Some(x), Some(y)) => {
                    x.data.as_bytes_mut().swap_with_slice(y.data.as_bytes_mut());
                    true
                }
                _ => false,
            }
        }

        fn get(&self, id: NodeId) -> Option<&Node> {
            self.slots.get(id.0)?.as_ref()
        }
    }

    // 链接操作
    impl<A: NodeAllocator> ByteList<A> {
        fn link(&self, id: NodeId) -> &Node {
            match self.get(id) {
                Some(node) => node,
                None => unreachable!("linked node {} is not live", id.0),
            }
        }

        fn link_mut(&mut self, id: NodeId) -> &mut Node {
            match self.slots.get_mut(id.0).and_then(Option::as_mut) {
                Some(node) => node,
                None => unreachable!("linked node {} is not live", id.0),
            }
        }

        fn check_len(&self, actual: usize) -> Result<(), ListError> {
            if actual != self.element_size {
                return Err(ListError::SizeMismatch {
                    expected: self.element_size,
                    actual,
                });
            }
            Ok(())
        }

        /// 为一个新节点预留槽位，同时保证空闲栈容量跟上槽位数量
        fn reserve_slot(&mut self) -> Result<(), ListError> {
            if !self.free.is_empty() {
                return Ok(());
            }
            let slot_bytes = mem::size_of::<Option<Node>>();
            self.slots
                .try_reserve(1)
                .map_err(|_| AllocError::OutOfMemory { bytes: slot_bytes })?;
            let wanted = self.slots.len() + 1;
            if self.free.capacity() < wanted {
                self.free
                    .try_reserve(wanted)
                    .map_err(|_| AllocError::OutOfMemory {
                        bytes: wanted * mem::size_of::<usize>(),
                    })?;
            }
            Ok(())
        }

        /// 分配并填充一个尚未链接的节点
        ///
        /// 所有可能失败的分配都在这里完成，失败时链表结构没有任何改动。
        fn new_node(&mut self, data: &[u8]) -> Result<NodeId, ListError> {
            self.check_len(data.len())?;
            self.reserve_slot()?;

            let mut payload = self.allocator.allocate(self.element_size).map_err(|err| {
                debug!(element_size = self.element_size, error = %err, "node allocation failed");
                err
            })?;
            debug_assert_eq!(payload.len(), self.element_size);
            payload.as_bytes_mut().copy_from_slice(data);

            let node = Node {
                data: payload,
                prev: None,
                next: None,
            };
            let index = match self.free.pop() {
                Some(index) => {
                    self.slots[index] = Some(node);
                    index
                }
                None => {
                    self.slots.push(Some(node));
                    self.slots.len() - 1
                }
            };
            Ok(NodeId(index))
        }

        /// 把 `id` 接在 `after` 之后；`after` 为 `None` 时接在 head 之前
        fn attach(&mut self, id: NodeId, after: Option<NodeId>) {
            let next = match after {
                Some(prev) => self.link(prev).next,
                None => self.head,
            };

            let node = self.link_mut(id);
            node.prev = after;
            node.next = next;

            if let Some(prev) = after {
                self.link_mut(prev).next = Some(id);
            }
            if let Some(next) = next {
                self.link_mut(next).prev = Some(id);
            }

            // 没有前驱的节点是新的 head，没有后继的节点是新的 tail
            if after.is_none() {
                self.head = Some(id);
            }
            if next.is_none() {
                self.tail = Some(id);
            }
            self.debug_check_links(&[Some(id)]);
        }

        /// 从链中摘下 `id`，head、tail、单元素和中间节点都适用
        fn detach(&mut self, id: NodeId) -> Node {
            let (prev, next) = {
                let node = self.link(id);
                (node.prev, node.next)
            };

            if let Some(prev) = prev {
                self.link_mut(prev).next = next;
            }
            if let Some(next) = next {
                self.link_mut(next).prev = prev;
            }

            if self.head == Some(id) {
                self.head = next;
            }
            if self.tail == Some(id) {
                self.tail = prev;
            }

            let mut node = match self.slots[id.0].take() {
                Some(node) => node,
                None => unreachable!("detached node {} is not live", id.0),
            };
            self.free.push(id.0);
            node.prev = None;
            node.next = None;
            self.debug_check_links(&[prev, next]);
            node
        }

        fn remove_node(&mut self, id: NodeId, out: Option<&mut [u8]>) -> Result<(), ListError> {
            if let Some(out) = out.as_deref() {
                self.check_len(out.len())?;
            }

            let node = self.detach(id);
            if let Some(out) = out {
                out.copy_from_slice(node.data.as_bytes());
            }
            self.allocator.release(node.data);
            Ok(())
        }

        /// 只检查刚改写过链接的节点及 head/tail，复杂度 O(1)
        ///
        /// 完整的不变量检查见 `check_invariants`。
        fn debug_check_links(&self, touched: &[Option<NodeId>]) {
            if !cfg!(debug_assertions) {
                return;
            }
            assert_eq!(
                self.head.is_none(),
                self.tail.is_none(),
                "head and tail must be unset together"
            );
            if let Some(head) = self.head {
                assert!(self.link(head).prev.is_none(), "head has a predecessor");
            }
            if let Some(tail) = self.tail {
                assert!(self.link(tail).next.is_none(), "tail has a successor");
            }
            for id in touched.iter().flatten().copied() {
                let node = self.link(id);
                if let Some(prev) = node.prev {
                    assert_eq!(self.link(prev).next, Some(id), "broken link before {}", id.0);
                } else {
                    assert_eq!(self.head, Some(id), "node {} without predecessor is not head", id.0);
                }
                if let Some(next) = node.next {
                    assert_eq!(self.link(next).prev, Some(id), "broken link after {}", id.0);
                } else {
                    assert_eq!(self.tail, Some(id), "node {} without successor is not tail", id.0);
                }
            }
        }
    }

    // 格式化输出
    impl<A: NodeAllocator> fmt::Debug for ByteList<A> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ByteList")
                .field("element_size", &self.element_size)
                .field("elements", &Elements(self))
                .finish()
        }
    }

    struct Elements<'a, A: NodeAllocator>(&'a ByteList<A>);

    impl<A: NodeAllocator> fmt::Debug for Elements<'_, A> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut entries = f.debug_list();
            let mut current = self.0.head;
            while let Some(id) = current {
                if let Some(bytes) = self.0.payload(id) {
                    entries.entry(&bytes);
                }
                current = self.0.next_of(id);
            }
            entries.finish()
        }
    }

    // 清理资源
    impl<A: NodeAllocator> Drop for ByteList<A> {
        fn drop(&mut self) {
            self.destroy();
        }
    }

}

pub mod c_list {
    use std::os::raw::{c_int, c_void};
    use std::{ptr, slice};

    use crate::other_list::ByteList;
    use crate::other_list_utils::{for_each, sort};

    // 不透明指针类型，对C完全隐藏实现细节
    pub struct CByteList {
        inner: ByteList,
    }

    /// 对每个元素调用的函数，参数指向元素数据区
    pub type CAction = extern "C" fn(*mut c_void);

    /// 比较函数，返回值 < 0 表示第一个参数应排在前面
    pub type CComparator = extern "C" fn(*const c_void, *const c_void) -> c_int;

    /// 创建元素大小为 `element_size` 字节的空链表
    ///
    /// `element_size` 为 0 时返回空指针。返回的链表必须用 `byte_list_free` 释放。
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_new(element_size: usize) -> *mut CByteList {
        match ByteList::try_new(element_size) {
            Ok(inner) => Box::into_raw(Box::new(CByteList { inner })),
            Err(_) => ptr::null_mut(),
        }
    }

    /// 释放链表及其全部节点，空指针不做任何事
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_free(list: *mut CByteList) {
        if !list.is_null() {
            unsafe {
                let _ = Box::from_raw(list);
            }
        }
    }

    /// 释放全部节点但保留链表本身
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_clear(list: *mut CByteList) {
        if let Some(list) = unsafe { list.as_mut() } {
            list.inner.destroy();
        }
    }

    /// 获取链表元素数量
    ///
    /// # 参数
    /// - `list`: 链表指针
    ///
    /// # 返回值
    /// 元素个数；`list` 为空指针时返回 0
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_size(list: *const CByteList) -> usize {
        match unsafe { list.as_ref() } {
            Some(list) => list.inner.size(),
            None => 0,
        }
    }

    /// 判断链表是否为空
    ///
    /// # 参数
    /// - `list`: 链表指针
    ///
    /// # 返回值
    /// 链表为空时返回 `true`；`list` 为空指针时同样返回 `true`
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_is_empty(list: *const CByteList) -> bool {
        match unsafe { list.as_ref() } {
            Some(list) => list.inner.is_empty(),
            None => true,
        }
    }

    /// 在尾部插入 `data` 指向的 `element_size` 个字节
    ///
    /// 分配失败或指针为空时返回 `false`，链表不变。
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_push_back(list: *mut CByteList, data: *const c_void) -> bool {
        let Some(list) = (unsafe { list.as_mut() }) else {
            return false;
        };
        if data.is_null() {
            return false;
        }
        let bytes = unsafe { slice::from_raw_parts(data.cast::<u8>(), list.inner.element_size()) };
        list.inner.push_back(bytes).is_ok()
    }

    /// 在头部插入，语义同 `byte_list_push_back`
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_push_front(list: *mut CByteList, data: *const c_void) -> bool {
        let Some(list) = (unsafe { list.as_mut() }) else {
            return false;
        };
        if data.is_null() {
            return false;
        }
        let bytes = unsafe { slice::from_raw_parts(data.cast::<u8>(), list.inner.element_size()) };
        list.inner.push_front(bytes).is_ok()
    }

    /// 移除尾部元素
    ///
    /// `out` 非空时写入 `element_size` 个字节；链表为空时返回 `false` 且不修改 `out`。
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_pop_back(list: *mut CByteList, out: *mut c_void) -> bool {
        let Some(list) = (unsafe { list.as_mut() }) else {
            return false;
        };
        let out = output_slice(out, list.inner.element_size());
        list.inner.pop_back(out).is_ok()
    }

    /// 移除头部元素，语义同 `byte_list_pop_back`
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_pop_front(list: *mut CByteList, out: *mut c_void) -> bool {
        let Some(list) = (unsafe { list.as_mut() }) else {
            return false;
        };
        let out = output_slice(out, list.inner.element_size());
        list.inner.pop_front(out).is_ok()
    }

    /// 从头到尾对每个元素调用 `action`，回调中不得修改链表结构
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_for_each(list: *mut CByteList, action: Option<CAction>) {
        let (Some(list), Some(action)) = (unsafe { list.as_mut() }, action) else {
            return;
        };
        for_each(&mut list.inner, |payload: &mut [u8]| {
            action(payload.as_mut_ptr().cast())
        });
    }

    /// 按 `cmp` 原地排序，返回交换次数
    #[unsafe(no_mangle)]
    pub extern "C" fn byte_list_sort(list: *mut CByteList, cmp: Option<CComparator>) -> usize {
        let (Some(list), Some(cmp)) = (unsafe { list.as_mut() }, cmp) else {
            return 0;
        };
        sort(&mut list.inner, |a: &[u8], b: &[u8]| {
            cmp(a.as_ptr().cast(), b.as_ptr().cast()).cmp(&0)
        })
    }

    fn output_slice<'a>(out: *mut c_void, len: usize) -> Option<&'a mut [u8]> {
        if out.is_null() {
            None
        } else {
            Some(unsafe { slice::from_raw_parts_mut(out.cast::<u8>(), len) })
        }
    }
}
