//! React component templates
//!
//! The root component is assembled from conditional fragments so its imports
//! and wiring always match the set of files actually emitted for the
//! requirement set.

use crate::model::ProjectDescriptor;
use crate::requirements::{Feature, RequirementsSet};

/// Root UI component, composed from the requirement set
pub(super) fn app_root(project: &ProjectDescriptor, requirements: &RequirementsSet) -> String {
    let crud_ui = requirements.has(Feature::Crud) || requirements.has(Feature::DataDisplay);
    let search = crud_ui && requirements.has(Feature::SearchFilter);

    if !crud_ui {
        return format!(
            r#"function App() {{
  return (
    <div className="min-h-screen bg-white text-gray-900">
      <main className="mx-auto max-w-3xl px-4 py-16 text-center">
        <h1 className="text-3xl font-bold">{name}</h1>
        <p className="mt-4 text-gray-600">{description}</p>
      </main>
    </div>
  )
}}

export default App
"#,
            name = project.name,
            description = project.description,
        );
    }

    let mut out = String::new();

    if search {
        out.push_str("import { useState } from 'react'\n");
    }
    out.push_str(
        "import { Header } from './components/Header'\n\
         import { ItemForm } from './components/ItemForm'\n\
         import { ItemList } from './components/ItemList'\n\
         import { useLocalStorage } from './hooks/useLocalStorage'\n\
         import type { Item } from './types'\n\n",
    );

    out.push_str(
        "function App() {\n  const [items, setItems] = useLocalStorage<Item[]>('items', [])\n",
    );
    if search {
        out.push_str("  const [query, setQuery] = useState('')\n");
    }

    out.push_str(
        "\n  const addItem = (item: Item) => setItems([...items, item])\n\
         \x20 const updateItem = (updated: Item) =>\n\
         \x20   setItems(items.map((item) => (item.id === updated.id ? updated : item)))\n\
         \x20 const removeItem = (id: string) => setItems(items.filter((item) => item.id !== id))\n",
    );

    if search {
        out.push_str(
            "\n  const needle = query.toLowerCase()\n\
             \x20 const visible = items.filter(\n\
             \x20   (item) =>\n\
             \x20     item.title.toLowerCase().includes(needle) ||\n\
             \x20     item.description.toLowerCase().includes(needle),\n\
             \x20 )\n",
        );
    }

    out.push_str(
        "\n  return (\n    <div className=\"min-h-screen bg-white text-gray-900 dark:bg-gray-900 dark:text-gray-100\">\n",
    );
    out.push_str(&format!("      <Header title=\"{}\" />\n", project.name));
    out.push_str("      <main className=\"mx-auto max-w-3xl px-4 py-8\">\n");
    out.push_str(&format!(
        "        <p className=\"mb-6 text-gray-600 dark:text-gray-400\">{}</p>\n",
        project.description
    ));
    if search {
        out.push_str(
            "        <input\n\
             \x20         type=\"search\"\n\
             \x20         value={query}\n\
             \x20         onChange={(event) => setQuery(event.target.value)}\n\
             \x20         placeholder=\"Search items...\"\n\
             \x20         className=\"mb-4 w-full rounded border px-3 py-2 dark:border-gray-700 dark:bg-gray-800\"\n\
             \x20       />\n",
        );
    }
    out.push_str("        <ItemForm onAdd={addItem} />\n");
    let list_source = if search { "visible" } else { "items" };
    out.push_str(&format!(
        "        <ItemList items={{{}}} onUpdate={{updateItem}} onRemove={{removeItem}} />\n",
        list_source
    ));
    out.push_str("      </main>\n    </div>\n  )\n}\n\nexport default App\n");

    out
}

/// Header with a dark-mode toggle: persisted choice wins, otherwise the
/// system color-scheme preference decides the initial theme.
pub(super) fn header() -> String {
    r#"import { useEffect, useState } from 'react'

const THEME_KEY = 'theme'

export function Header({ title }: { title: string }) {
  const [dark, setDark] = useState(() => {
    const stored = window.localStorage.getItem(THEME_KEY)
    if (stored !== null) return stored === 'dark'
    return window.matchMedia('(prefers-color-scheme: dark)').matches
  })

  useEffect(() => {
    document.documentElement.classList.toggle('dark', dark)
    window.localStorage.setItem(THEME_KEY, dark ? 'dark' : 'light')
  }, [dark])

  return (
    <header className="border-b border-gray-200 dark:border-gray-700">
      <div className="mx-auto flex max-w-3xl items-center justify-between px-4 py-4">
        <h1 className="text-xl font-semibold">{title}</h1>
        <button
          onClick={() => setDark(!dark)}
          aria-label="Toggle dark mode"
          className="rounded border px-3 py-1 text-sm dark:border-gray-600"
        >
          {dark ? 'Light' : 'Dark'}
        </button>
      </div>
    </header>
  )
}
"#
    .to_string()
}

pub(super) fn item_form() -> String {
    r#"import { useState } from 'react'
import type { Item, ItemPriority } from '../types'

export function ItemForm({ onAdd }: { onAdd: (item: Item) => void }) {
  const [title, setTitle] = useState('')
  const [description, setDescription] = useState('')
  const [priority, setPriority] = useState<ItemPriority>('medium')

  const submit = (event: React.FormEvent) => {
    event.preventDefault()
    if (!title.trim()) return
    onAdd({
      id: crypto.randomUUID(),
      title: title.trim(),
      description: description.trim(),
      status: 'todo',
      priority,
      createdAt: new Date().toISOString(),
    })
    setTitle('')
    setDescription('')
  }

  return (
    <form onSubmit={submit} className="mb-6 space-y-2">
      <input
        value={title}
        onChange={(event) => setTitle(event.target.value)}
        placeholder="Title"
        className="w-full rounded border px-3 py-2 dark:border-gray-700 dark:bg-gray-800"
      />
      <input
        value={description}
        onChange={(event) => setDescription(event.target.value)}
        placeholder="Description"
        className="w-full rounded border px-3 py-2 dark:border-gray-700 dark:bg-gray-800"
      />
      <div className="flex items-center gap-2">
        <select
          value={priority}
          onChange={(event) => setPriority(event.target.value as ItemPriority)}
          className="rounded border px-2 py-2 dark:border-gray-700 dark:bg-gray-800"
        >
          <option value="high">High</option>
          <option value="medium">Medium</option>
          <option value="low">Low</option>
        </select>
        <button
          type="submit"
          className="rounded bg-blue-600 px-4 py-2 text-white hover:bg-blue-700"
        >
          Add
        </button>
      </div>
    </form>
  )
}
"#
    .to_string()
}

/// List sorted by the fixed two-key comparator: status first
/// (in-progress, todo, done), then priority (high, medium, low).
pub(super) fn item_list() -> String {
    r#"import type { Item, ItemPriority, ItemStatus } from '../types'
import { ItemCard } from './ItemCard'

const STATUS_ORDER: Record<ItemStatus, number> = { 'in-progress': 0, todo: 1, done: 2 }
const PRIORITY_ORDER: Record<ItemPriority, number> = { high: 0, medium: 1, low: 2 }

interface ItemListProps {
  items: Item[]
  onUpdate: (item: Item) => void
  onRemove: (id: string) => void
}

export function ItemList({ items, onUpdate, onRemove }: ItemListProps) {
  const sorted = [...items].sort(
    (a, b) =>
      STATUS_ORDER[a.status] - STATUS_ORDER[b.status] ||
      PRIORITY_ORDER[a.priority] - PRIORITY_ORDER[b.priority],
  )

  if (sorted.length === 0) {
    return <p className="text-gray-500 dark:text-gray-400">Nothing here yet.</p>
  }

  return (
    <ul className="space-y-2">
      {sorted.map((item) => (
        <ItemCard key={item.id} item={item} onUpdate={onUpdate} onRemove={onRemove} />
      ))}
    </ul>
  )
}
"#
    .to_string()
}

pub(super) fn item_card() -> String {
    r#"import type { Item, ItemStatus } from '../types'

const NEXT_STATUS: Record<ItemStatus, ItemStatus> = {
  todo: 'in-progress',
  'in-progress': 'done',
  done: 'todo',
}

interface ItemCardProps {
  item: Item
  onUpdate: (item: Item) => void
  onRemove: (id: string) => void
}

export function ItemCard({ item, onUpdate, onRemove }: ItemCardProps) {
  return (
    <li className="flex items-center justify-between rounded border p-3 dark:border-gray-700">
      <div>
        <p className={item.status === 'done' ? 'line-through opacity-60' : ''}>
          {item.title}
        </p>
        {item.description && (
          <p className="text-sm text-gray-500 dark:text-gray-400">{item.description}</p>
        )}
      </div>
      <div className="flex items-center gap-2 text-sm">
        <span className="rounded bg-gray-100 px-2 py-1 dark:bg-gray-800">{item.priority}</span>
        <button
          onClick={() => onUpdate({ ...item, status: NEXT_STATUS[item.status] })}
          className="rounded border px-2 py-1 dark:border-gray-600"
        >
          {item.status}
        </button>
        <button
          onClick={() => onRemove(item.id)}
          aria-label="Remove item"
          className="rounded border px-2 py-1 text-red-600 dark:border-gray-600"
        >
          x
        </button>
      </div>
    </li>
  )
}
"#
    .to_string()
}
