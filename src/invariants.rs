//! 结构不变量 P 的检查
//!
//! 每个公开操作前后链表都必须满足：
//! * `head` 为空当且仅当 `tail` 为空；
//! * 头节点没有前驱，尾节点没有后继；
//! * 相邻节点的 `next` 与 `prev` 互相指回（由此链中不可能有环）；
//! * 从 `head` 正向遍历恰好经过所有存活节点并终止于 `tail`；
//! * 每个节点的数据区长度等于 `element_size`。

use crate::alloc::NodeAllocator;
use crate::error::InvariantError;
use crate::list::list::Node;
use crate::other_list::{ByteList, NodeId};

impl<A: NodeAllocator> ByteList<A> {
    /// 检查不变量 P，返回遇到的第一个违反项
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let (head, tail) = match (self.head, self.tail) {
            (None, None) => return self.check_no_live_nodes(),
            (Some(head), Some(tail)) => (head, tail),
            _ => return Err(InvariantError::HeadTailMismatch),
        };

        if self.link_at(head)?.prev.is_some() {
            return Err(InvariantError::HeadHasPrev);
        }
        if self.link_at(tail)?.next.is_some() {
            return Err(InvariantError::TailHasNext);
        }

        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        let mut reachable = 0;
        let mut previous: Option<NodeId> = None;
        let mut current = Some(head);

        while let Some(id) = current {
            let node = self.link_at(id)?;
            reachable += 1;
            if node.prev != previous {
                return Err(InvariantError::BrokenBackLink { node: id.index() });
            }
            if node.data.len() != self.element_size() {
                return Err(InvariantError::PayloadSize {
                    node: id.index(),
                    expected: self.element_size(),
                    actual: node.data.len(),
                });
            }
            previous = Some(id);
            current = node.next;
        }

        if previous != Some(tail) {
            return Err(InvariantError::TailUnreachable);
        }
        if reachable != live {
            return Err(InvariantError::OrphanedNodes { reachable, live });
        }
        Ok(())
    }

    fn check_no_live_nodes(&self) -> Result<(), InvariantError> {
        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        if live != 0 {
            return Err(InvariantError::OrphanedNodes { reachable: 0, live });
        }
        Ok(())
    }

    fn link_at(&self, id: NodeId) -> Result<&Node, InvariantError> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(InvariantError::DanglingLink { slot: id.index() })
    }
}
